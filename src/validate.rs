//! Request body rules. The first broken rule is the one reported.

use serde::Deserialize;

use crate::{
    db::{ListingFields, ReviewFields},
    uploads::Upload,
    AppError, AppResult,
};

/// Listing form fields as submitted, before any checks.
#[derive(Debug, Default, Clone)]
pub struct ListingForm {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<String>,
    pub location: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct ReviewForm {
    #[serde(default)]
    pub rating: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
}

pub fn validate_listing(form: &ListingForm) -> AppResult<ListingFields> {
    let title = required("title", &form.title)?;
    let description = required("description", &form.description)?;
    let price = number("price", &form.price)?;
    if price < 0.0 {
        return Err(AppError::Validation("\"price\" must be greater than or equal to 0".into()));
    }
    let location = required("location", &form.location)?;
    let country = required("country", &form.country)?;

    Ok(ListingFields { title, description, price, location, country })
}

pub fn validate_image(upload: &Upload) -> AppResult<()> {
    match upload.extension() {
        Some(_) => Ok(()),
        None => Err(AppError::Validation("Only png, jpg and jpeg images are allowed".into())),
    }
}

pub fn validate_review(form: &ReviewForm) -> AppResult<ReviewFields> {
    let rating = integer("rating", &form.rating)?;
    if rating < 1 {
        return Err(AppError::Validation("\"rating\" must be greater than or equal to 1".into()));
    }
    if rating > 5 {
        return Err(AppError::Validation("\"rating\" must be less than or equal to 5".into()));
    }
    let comment = required("comment", &form.comment)?;

    Ok(ReviewFields { comment, rating })
}

fn required(name: &str, value: &Option<String>) -> AppResult<String> {
    match value.as_deref().map(str::trim) {
        None => Err(AppError::Validation(format!("\"{name}\" is required"))),
        Some("") => Err(AppError::Validation(format!("\"{name}\" is not allowed to be empty"))),
        Some(value) => Ok(value.to_owned()),
    }
}

fn number(name: &str, value: &Option<String>) -> AppResult<f64> {
    let value = required(name, value)?;
    match value.parse::<f64>() {
        Ok(number) if number.is_finite() => Ok(number),
        _ => Err(AppError::Validation(format!("\"{name}\" must be a number"))),
    }
}

fn integer(name: &str, value: &Option<String>) -> AppResult<i64> {
    let value = required(name, value)?;
    value.parse::<i64>().map_err(|_| {
        if value.parse::<f64>().is_ok_and(f64::is_finite) {
            AppError::Validation(format!("\"{name}\" must be an integer"))
        } else {
            AppError::Validation(format!("\"{name}\" must be a number"))
        }
    })
}
