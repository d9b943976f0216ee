//! Wire shapes of Lizard list replies. Only the first page is ever read.

/// One results page of a list endpoint.
#[derive(Debug, serde::Deserialize)]
pub(crate) struct Page<T> {
    pub(crate) count: u64,
    pub(crate) results: Vec<T>,
}

#[derive(Debug, serde::Deserialize)]
pub(crate) struct IdRow {
    pub(crate) id: i64,
}

#[derive(Debug, serde::Deserialize)]
pub(crate) struct UuidRow {
    pub(crate) uuid: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_of_uuid_rows_ignores_extra_fields() {
        let page: Page<UuidRow> = serde_json::from_str(
            r#"{"count": 2, "next": null, "previous": null,
                "results": [{"uuid": "a", "name": "x"}, {"uuid": "b"}]}"#,
        )
        .unwrap();
        assert_eq!(page.count, 2);
        assert_eq!(page.results[0].uuid, "a");
    }

    #[test]
    fn id_rows_carry_numeric_ids() {
        let page: Page<IdRow> =
            serde_json::from_str(r#"{"count": 1, "results": [{"id": 42}]}"#).unwrap();
        assert_eq!(page.results[0].id, 42);
    }
}
