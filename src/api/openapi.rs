use super::handlers::{health, root, users};
use utoipa::openapi::{Contact, InfoBuilder, License, OpenApiBuilder, Tag};
use utoipa_axum::{router::OpenApiRouter, routes};

#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    let (_router, openapi) = api_router().split_for_parts();
    openapi
}

/// Router that both serves the documented endpoints and builds the `OpenAPI` document.
///
/// New endpoints go here via `.routes(routes!(...))`.
pub(crate) fn api_router() -> OpenApiRouter {
    OpenApiRouter::with_openapi(cargo_openapi())
        .routes(routes!(health::health))
        .routes(routes!(root::root))
        .routes(routes!(users::get_public_user))
        .routes(routes!(users::get_me))
        .routes(routes!(users::create_user))
}

fn api_tags() -> Vec<Tag> {
    [
        ("myapi", "User accounts API"),
        ("users", "Account creation and lookup"),
        ("health", "Service and storage health"),
    ]
    .into_iter()
    .map(|(name, description)| {
        let mut tag = Tag::new(name);
        tag.description = Some(description.to_string());
        tag
    })
    .collect()
}

fn cargo_openapi() -> utoipa::openapi::OpenApi {
    let mut info = InfoBuilder::new()
        .title(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .description(non_empty(env!("CARGO_PKG_DESCRIPTION")))
        .build();

    info.contact = cargo_contact(env!("CARGO_PKG_AUTHORS"));
    info.license = non_empty(env!("CARGO_PKG_LICENSE")).map(|identifier| {
        let mut license = License::new(identifier);
        license.identifier = Some(identifier.to_string());
        license
    });

    OpenApiBuilder::new()
        .info(info)
        .tags(Some(api_tags()))
        .build()
}

// Cargo joins authors with `:`; only the first one is published.
fn cargo_contact(authors: &str) -> Option<Contact> {
    let primary = authors.split(':').next().map(str::trim)?;

    let (name, email) = match primary.find('<') {
        Some(start) => (
            non_empty(&primary[..start]),
            non_empty(primary[start + 1..].trim_end_matches('>')),
        ),
        None => (non_empty(primary), None),
    };

    if name.is_none() && email.is_none() {
        return None;
    }

    let mut contact = Contact::new();
    contact.name = name.map(str::to_string);
    contact.email = email.map(str::to_string);
    Some(contact)
}

fn non_empty(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}
