//! HTML search form served at `/`

use axum::{
    http::{header, HeaderValue},
    response::{Html, IntoResponse, Response},
};

const INDEX_PAGE: &str = r#"<!doctype html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>Search products</title>
    <style>
        body { font-family: sans-serif; max-width: 40rem; margin: 2rem auto; }
        label { display: block; margin-top: 1rem; }
        input[type=text], input[type=number] { width: 100%; padding: .4rem; }
        small { color: #666; }
        .actions { margin-top: 1.5rem; }
    </style>
</head>
<body>
    <h1>Search products</h1>
    <form method="GET" action="/v1/products">
        <input type="hidden" name="pretty" value="yes" />
        <label for="q">Search for</label>
        <input id="q" type="text" name="q" />
        <label for="size">return</label>
        <input id="size" type="number" name="size" min="0" />
        <small>results per page</small>
        <label for="from">starting from</label>
        <input id="from" type="number" name="from" min="0" />
        <label for="sort">sorted by</label>
        <input id="sort" type="text" name="sort" placeholder="i.e. price:desc" />
        <label for="filter">and filtered by</label>
        <input id="filter" type="text" name="filter" placeholder="i.e. brand:Nike" />
        <div class="actions">
            <button type="reset">Reset</button>
            <button type="submit">Go!</button>
        </div>
    </form>
</body>
</html>
"#;

/// The page carries its own CSP; the security middleware keeps it.
pub async fn index_page() -> Response {
    let mut response = Html(INDEX_PAGE).into_response();
    response.headers_mut().insert(
        header::CONTENT_SECURITY_POLICY,
        HeaderValue::from_static("default-src 'none'; style-src 'unsafe-inline'; form-action 'self'"),
    );
    response
}
