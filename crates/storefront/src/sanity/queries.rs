//! GROQ queries for the storefront's read operations.
//!
//! Each query is a fixed projection. Lists only include documents with a
//! defined slug and are ordered by `_updatedAt desc` with no secondary key,
//! so documents updated at the same instant come back in unstable order.
//!
//! Detail queries take a single `$slug` parameter.

/// Number of products on the home page.
pub const FEATURED_PRODUCTS_LIMIT: usize = 6;

/// Number of posts on the home page.
pub const FEATURED_POSTS_LIMIT: usize = 2;

/// Full product document by slug.
pub const PRODUCT_BY_SLUG: &str = r#"
  *[_type == "product" && slug.current == $slug][0]{
    _id,
    _createdAt,
    _updatedAt,
    title,
    "slug": slug.current,
    price,
    shopeeUrl,
    images[]{
      ...,
      alt
    },
    customOptions[]{
      groupName,
      choices
    },
    body
  }
"#;

/// Full post document by slug, with related products dereferenced.
pub const POST_BY_SLUG: &str = r#"
  *[_type == "post" && slug.current == $slug][0]{
    _id,
    _createdAt,
    _updatedAt,
    title,
    "slug": slug.current,
    mainImage{
      ...,
      alt
    },
    seoTitle,
    seoDescription,
    body,
    "relatedProducts": coalesce(
      relatedProducts[]->{
        _id,
        _updatedAt,
        title,
        "slug": slug.current,
        price,
        "mainImage": images[0]{
          ...,
          alt
        },
        shopeeUrl
      },
      []
    )
  }
"#;

/// Most recently updated products, first [`FEATURED_PRODUCTS_LIMIT`].
pub const FEATURED_PRODUCTS: &str = r#"
  *[_type == "product" && defined(slug.current)] | order(_updatedAt desc)[0...6]{
    _id,
    _updatedAt,
    title,
    "slug": slug.current,
    price,
    "mainImage": images[0]{
      ...,
      alt
    },
    shopeeUrl
  }
"#;

/// Every product, most recently updated first.
pub const ALL_PRODUCTS: &str = r#"
  *[_type == "product" && defined(slug.current)] | order(_updatedAt desc){
    _id,
    _updatedAt,
    title,
    "slug": slug.current,
    price,
    "mainImage": images[0]{
      ...,
      alt
    },
    shopeeUrl
  }
"#;

/// Most recently updated posts, first [`FEATURED_POSTS_LIMIT`].
pub const FEATURED_POSTS: &str = r#"
  *[_type == "post" && defined(slug.current)] | order(_updatedAt desc)[0...2]{
    _id,
    _updatedAt,
    title,
    "slug": slug.current,
    mainImage{
      ...,
      alt
    },
    seoTitle,
    seoDescription,
    "relatedProducts": coalesce(
      relatedProducts[]->{
        _id,
        _updatedAt,
        title,
        "slug": slug.current,
        price,
        "mainImage": images[0]{
          ...,
          alt
        },
        shopeeUrl
      },
      []
    )
  }
"#;

/// Every post, most recently updated first.
pub const ALL_POSTS: &str = r#"
  *[_type == "post" && defined(slug.current)] | order(_updatedAt desc){
    _id,
    _updatedAt,
    title,
    "slug": slug.current,
    mainImage{
      ...,
      alt
    },
    seoTitle,
    seoDescription,
    "relatedProducts": coalesce(
      relatedProducts[]->{
        _id,
        _updatedAt,
        title,
        "slug": slug.current,
        price,
        "mainImage": images[0]{
          ...,
          alt
        },
        shopeeUrl
      },
      []
    )
  }
"#;
