use std::fmt;

/// Resource collections exposed by the Lizard API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Organisations,
    Locations,
    ObservationTypes,
    Timeseries,
    RasterSources,
    Rasters,
    Tasks,
}

impl Endpoint {
    /// URL path segment of this collection.
    pub fn as_str(self) -> &'static str {
        match self {
            Endpoint::Organisations => "organisations",
            Endpoint::Locations => "locations",
            Endpoint::ObservationTypes => "observationtypes",
            Endpoint::Timeseries => "timeseries",
            Endpoint::RasterSources => "rastersources",
            Endpoint::Rasters => "rasters",
            Endpoint::Tasks => "tasks",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_segments_match_the_service() {
        assert_eq!(Endpoint::ObservationTypes.as_str(), "observationtypes");
        assert_eq!(Endpoint::RasterSources.to_string(), "rastersources");
    }
}
