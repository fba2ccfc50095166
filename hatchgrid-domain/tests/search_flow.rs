use chrono::{DateTime, Duration, TimeZone, Utc};
use hatchgrid_domain::criteria::{Criteria, FieldSource, Value};
use hatchgrid_domain::presentation::InvalidRequestKind;
use hatchgrid_domain::presentation::filter::{FieldType, RhsFilterParser};
use hatchgrid_domain::presentation::pagination::{
    Cursor, CursorPageResponse, PaginationConfig, TimestampCursor,
};
use hatchgrid_domain::presentation::sort::SortParser;

#[derive(Debug, Clone, PartialEq)]
struct Form {
    id: String,
    name: String,
    created_at: DateTime<Utc>,
}

impl FieldSource for Form {
    fn field(&self, key: &str) -> Option<Value> {
        match key {
            "id" => Some(self.id.clone().into()),
            "name" => Some(self.name.clone().into()),
            "created_at" => Some(self.created_at.into()),
            _ => None,
        }
    }
}

fn forms() -> Vec<Form> {
    let base = Utc.with_ymd_and_hms(2024, 10, 1, 0, 0, 0).unwrap();
    [
        "Newsletter signup",
        "Contact",
        "Weekly newsletter",
        "Feedback",
        "Newsletter footer",
        "Newsletter popup",
    ]
    .iter()
    .enumerate()
    .map(|(i, name)| Form {
        id: format!("f{}", i + 1),
        name: name.to_string(),
        created_at: base + Duration::minutes(i as i64),
    })
    .collect()
}

/// 模拟仓储：按 (created_at, id) 升序，跳过游标之前的数据，多取一条
fn search(
    source: &[Form],
    criteria: &Criteria,
    size: usize,
    cursor: Option<&str>,
) -> Result<CursorPageResponse<Form>, hatchgrid_domain::presentation::InvalidRequestError> {
    let position = cursor.map(TimestampCursor::decode).transpose()?;

    let mut rows: Vec<Form> = source
        .iter()
        .filter(|f| criteria.matches(*f))
        .filter(|f| match &position {
            Some(c) => (f.created_at, f.id.as_str()) > (c.timestamp(), c.id()),
            None => true,
        })
        .cloned()
        .collect();
    rows.sort_by(|a, b| (a.created_at, &a.id).cmp(&(b.created_at, &b.id)));
    rows.truncate(size + 1);

    Ok(CursorPageResponse::from_window(
        rows,
        size,
        cursor.map(str::to_string),
        |f| TimestampCursor::new(f.created_at, f.id.clone()).encode(),
    ))
}

#[test]
fn filtered_search_pages_through_results_with_opaque_cursors() {
    let parser = RhsFilterParser::new([("name", FieldType::Text), ("id", FieldType::Text)]);
    let criteria = parser
        .parse([("name", ["ilk:%newsletter%"])], true)
        .unwrap();
    let size = PaginationConfig::builder()
        .default_size(3)
        .build()
        .resolve_size(None)
        .unwrap();

    let source = forms();
    let first = search(&source, &criteria, size, None).unwrap();
    let ids: Vec<&str> = first.data().iter().map(|f| f.id.as_str()).collect();
    assert_eq!(ids, ["f1", "f3", "f5"]);
    assert_eq!(first.prev_page_cursor(), None);

    let next = first.next_page_cursor().expect("more results").to_string();
    let second = search(&source, &criteria, size, Some(&next)).unwrap();
    let ids: Vec<&str> = second.data().iter().map(|f| f.id.as_str()).collect();
    assert_eq!(ids, ["f6"]);
    assert_eq!(second.prev_page_cursor(), Some(next.as_str()));
    assert_eq!(second.next_page_cursor(), None);

    let names = second.map_items(|f| f.name);
    assert_eq!(names.data(), ["Newsletter popup".to_string()]);
}

#[test]
fn sort_parser_orders_in_memory_rows() {
    let sort = SortParser::new(["name", "created_at"])
        .parse(["desc:created_at"])
        .unwrap();

    let mut rows = forms();
    rows.sort_by(|a, b| sort.compare(a, b));
    assert_eq!(rows.first().map(|f| f.id.as_str()), Some("f6"));
    assert_eq!(rows.last().map(|f| f.id.as_str()), Some("f1"));
}

#[test]
fn tampered_cursor_is_rejected_before_searching() {
    let err = search(&forms(), &Criteria::Empty, 2, Some("not-a-cursor")).unwrap_err();
    assert_eq!(err.kind(), InvalidRequestKind::General);
}
