use axum::extract::Multipart;

use crate::{
    uploads::Upload,
    validate::{self, ListingForm},
    db::ListingFields,
    AppResult,
};

/// Reads a listing form. Fields may be named `title` or `listing[title]`.
pub(crate) async fn read(mut multipart: Multipart) -> AppResult<(ListingForm, Option<Upload>)> {
    let mut form = ListingForm::default();
    let mut upload = None;

    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };
        let key = name
            .strip_prefix("listing[")
            .and_then(|rest| rest.strip_suffix(']'))
            .unwrap_or(&name);

        match key {
            "image" => {
                let file_name = field.file_name().unwrap_or_default().to_owned();
                let content_type = field.content_type().map(str::to_owned);
                let bytes = field.bytes().await?;
                // an untouched file input still sends an empty part
                if !bytes.is_empty() {
                    upload = Some(Upload { file_name, content_type, bytes });
                }
            }
            "title" => form.title = Some(field.text().await?),
            "description" => form.description = Some(field.text().await?),
            "price" => form.price = Some(field.text().await?),
            "location" => form.location = Some(field.text().await?),
            "country" => form.country = Some(field.text().await?),
            _ => {}
        }
    }

    Ok((form, upload))
}

/// Reads and validates in one go; nothing is stored yet.
pub(crate) async fn read_valid(multipart: Multipart) -> AppResult<(ListingFields, Option<Upload>)> {
    let (form, upload) = read(multipart).await?;
    let fields = validate::validate_listing(&form)?;
    if let Some(upload) = &upload {
        validate::validate_image(upload)?;
    }
    Ok((fields, upload))
}
