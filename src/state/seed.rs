/// Illustrative data used when the session holds nothing yet.
/// All coordinates sit inside the site bounds.

use chrono::NaiveDate;

use super::data::{ImageryLayer, SignInstance, SignStatus, SignType};
use crate::map::projection::MapBounds;

const fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    match NaiveDate::from_ymd_opt(year, month, day) {
        Some(date) => date,
        None => panic!("invalid seed date"),
    }
}

const JULY_25: NaiveDate = date(2024, 7, 25);
const JULY_24: NaiveDate = date(2024, 7, 24);
const JULY_23: NaiveDate = date(2024, 7, 23);
const JULY_22: NaiveDate = date(2024, 7, 22);
const JULY_20: NaiveDate = date(2024, 7, 20);
const JUNE_15: NaiveDate = date(2024, 6, 15);

pub fn sign_types() -> Vec<SignType> {
    [
        (1, "Speed Limit 30", "Road speed limit sign"),
        (2, "Caution: Heavy Machinery", "Heavy machinery warning sign"),
        (3, "Mobile Phones Prohibited", "Safety zone sign"),
    ]
    .into_iter()
    .map(|(id, name, description)| SignType {
        id,
        name: name.to_string(),
        description: description.to_string(),
        image: None,
    })
    .collect()
}

pub fn signs() -> Vec<SignInstance> {
    [
        (1, 1, 39.7600, 29.1850, "Ahmet Yılmaz", JULY_25, SignStatus::Good),
        (2, 2, 39.7610, 29.1870, "Mehmet Kaya", JULY_24, SignStatus::Damaged),
        (3, 3, 39.7590, 29.1830, "Ali Demir", JULY_23, SignStatus::Good),
        (4, 1, 39.7620, 29.1890, "Fatma Şahin", JULY_22, SignStatus::Missing),
    ]
    .into_iter()
    .map(|(id, sign_type_id, lat, lng, placed_by, placed_date, status)| SignInstance {
        id,
        sign_type_id,
        lat,
        lng,
        placed_by: placed_by.to_string(),
        placed_date,
        status,
        photo: None,
    })
    .collect()
}

pub fn layers() -> Vec<ImageryLayer> {
    [
        (1, "Site Imagery - July 2024", true, JULY_20),
        (2, "Site Imagery - June 2024", false, JUNE_15),
    ]
    .into_iter()
    .map(|(id, name, visible, upload_date)| ImageryLayer {
        id,
        name: name.to_string(),
        url: None,
        bounds: MapBounds::site(),
        metadata: None,
        visible,
        opacity: 0.8,
        upload_date,
    })
    .collect()
}
