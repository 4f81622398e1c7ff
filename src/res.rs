use axum::{
    debug_handler,
    http::header,
    response::{Html, IntoResponse},
    routing::get,
    Router,
};

use crate::{session::Ctx, AppResult, AppState};

#[macro_export]
macro_rules! include_res {
    (bytes, $p:expr) => {
        include_bytes!(concat!(env!("CARGO_MANIFEST_DIR"), "/res", $p))
    };
    (str, $p:expr) => {
        include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/res", $p))
    };
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/style.css", get(stylesheet))
        .route("/listing.svg", get(placeholder))
}

#[debug_handler]
async fn stylesheet() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css")], include_res!(str, "/assets/style.css"))
}

#[debug_handler]
async fn placeholder() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "image/svg+xml")], include_res!(bytes, "/assets/listing.svg"))
}

/// Shown for listings without an uploaded image.
pub const PLACEHOLDER_IMAGE: &str = "/assets/listing.svg";

/// Escapes text for HTML bodies and attributes.
///
/// Braces are escaped too so user text can never be mistaken for a template
/// placeholder by a later `replace`.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '{' => out.push_str("&#123;"),
            '}' => out.push_str("&#125;"),
            _ => out.push(c),
        }
    }
    out
}

/// Renders Markdown with any raw HTML shown as text. Links and images may only
/// point at http(s) URLs or paths on this site.
pub fn markdown(source: &str) -> String {
    use pulldown_cmark::{Event, Options, Parser, Tag};

    let parser = Parser::new_ext(source, Options::ENABLE_STRIKETHROUGH)
        .map(|event| match event {
            Event::Html(html) | Event::InlineHtml(html) => Event::Text(html),
            Event::Start(Tag::Link { link_type, dest_url, title, id }) if !safe_url(&dest_url) => {
                Event::Start(Tag::Link { link_type, dest_url: "#".into(), title, id })
            }
            Event::Start(Tag::Image { link_type, dest_url, title, id }) if !safe_url(&dest_url) => {
                Event::Start(Tag::Image { link_type, dest_url: "#".into(), title, id })
            }
            _ => event,
        });

    let mut html_output = String::new();
    pulldown_cmark::html::push_html(&mut html_output, parser);
    html_output.replace('{', "&#123;").replace('}', "&#125;")
}

fn safe_url(url: &str) -> bool {
    let lower = url.trim_start().to_ascii_lowercase();
    ["http://", "https://", "/", "#"].iter().any(|prefix| lower.starts_with(prefix))
}

/// Wraps a page body in the layout, consuming any pending flash messages.
pub async fn page(ctx: &Ctx, title: &str, body: &str) -> AppResult<Html<String>> {
    let flash = ctx.take_flash().await?;

    let mut alerts = String::new();
    for message in &flash.success {
        alerts += &include_res!(str, "/pages/flash.html")
            .replace("{kind}", "success")
            .replace("{message}", &escape(message));
    }
    for message in &flash.error {
        alerts += &include_res!(str, "/pages/flash.html")
            .replace("{kind}", "error")
            .replace("{message}", &escape(message));
    }

    let nav = match &ctx.user {
        Some(user) => include_res!(str, "/pages/nav_user.html").replace("{username}", &escape(&user.username)),
        None => include_res!(str, "/pages/nav_guest.html").to_owned(),
    };

    Ok(Html(layout(title, &nav, &alerts, body)))
}

/// The error page. Rendered without a session, so the nav is the guest one.
pub fn error_page(message: &str) -> Html<String> {
    let body = include_res!(str, "/pages/error.html").replace("{message}", &escape(message));
    Html(layout("Error", include_res!(str, "/pages/nav_guest.html"), "", &body))
}

fn layout(title: &str, nav: &str, flash: &str, body: &str) -> String {
    include_res!(str, "/pages/layout.html")
        .replace("{title}", &escape(title))
        .replace("{nav}", nav)
        .replace("{flash}", flash)
        .replace("{body}", body)
}
