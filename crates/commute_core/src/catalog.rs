//! Built-in Metro Manila routes for demos and tests.

use crate::error::ConfigError;
use crate::geo::GeoPoint;
use crate::route::{Route, Stop};

pub const EDSA_CUBAO_MAKATI: &str = "EDSA - Cubao to Makati";
pub const COMMONWEALTH_AVE: &str = "Commonwealth Ave";
pub const KATIPUNAN_AVE: &str = "Katipunan Ave";
pub const TAFT_AVE: &str = "Taft Ave";

fn stop(name: &str, lat: f64, lng: f64) -> Stop {
    Stop::new(name, GeoPoint::new(lat, lng))
}

pub fn edsa_cubao_makati() -> Result<Route, ConfigError> {
    Route::new(
        EDSA_CUBAO_MAKATI,
        vec![
            stop("Cubao", 14.619700, 121.053200).with_description("Araneta Center terminal"),
            stop("Ortigas", 14.587900, 121.056700),
            stop("Guadalupe", 14.567200, 121.045800),
            stop("Ayala", 14.549500, 121.027600).with_description("Makati CBD"),
        ],
    )
}

pub fn commonwealth_ave() -> Result<Route, ConfigError> {
    Route::new(
        COMMONWEALTH_AVE,
        vec![
            stop("Philcoa", 14.653600, 121.049000),
            stop("Tandang Sora", 14.676000, 121.073000),
            stop("Fairview", 14.707000, 121.072000),
        ],
    )
}

pub fn katipunan_ave() -> Result<Route, ConfigError> {
    Route::new(
        KATIPUNAN_AVE,
        vec![
            stop("Ateneo Gate 2", 14.639400, 121.077900),
            stop("Aurora Blvd", 14.631000, 121.074500),
            stop("C5 Libis", 14.613000, 121.074000),
        ],
    )
}

pub fn taft_ave() -> Result<Route, ConfigError> {
    Route::new(
        TAFT_AVE,
        vec![
            stop("Vito Cruz", 14.564098, 120.994498),
            stop("Quiapo", 14.607594, 120.990500),
        ],
    )
}

/// Every catalog route, in display order.
pub fn all_routes() -> Result<Vec<Route>, ConfigError> {
    Ok(vec![
        edsa_cubao_makati()?,
        commonwealth_ave()?,
        katipunan_ave()?,
        taft_ave()?,
    ])
}

pub fn find(key: &str) -> Option<Route> {
    all_routes()
        .ok()?
        .into_iter()
        .find(|route| route.key().0 == key)
}
