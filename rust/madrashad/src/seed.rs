use anyhow::Context;

use crate::config::SeedSource;
use crate::hostel;
use crate::model::School;

const SAMPLE_SCHOOL: &str = include_str!("../fixtures/sample_school.json");

pub fn load(source: SeedSource) -> anyhow::Result<School> {
    match source {
        SeedSource::Sample => sample_school(),
        SeedSource::Empty => Ok(School::default()),
    }
}

pub fn sample_school() -> anyhow::Result<School> {
    let school: School =
        serde_json::from_str(SAMPLE_SCHOOL).context("failed to parse sample school fixture")?;
    // A broken fixture must not start the process with a student in two rooms.
    hostel::verify_unique_allocation(&school.rooms)
        .context("sample school fixture violates room allocation")?;
    Ok(school)
}
