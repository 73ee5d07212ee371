use serde_json::json;
use shelfwise_core::GridConfig;
use shelfwise_slotting::{evaluate, FeeTable, FeeTableError};

#[test]
fn test_fee_table_from_json() {
    let table: FeeTable = serde_json::from_value(json!([[10.0, 20.0], [30.0, 40.0]])).unwrap();
    assert_eq!(table.fee_at("B2"), Some(40.0));

    let err = serde_json::from_value::<FeeTable>(json!([[1.0], [2.0, 3.0]])).unwrap_err();
    assert!(err.to_string().contains("row 1"));
}

#[test]
fn test_config_sized_grid() {
    let grid = GridConfig {
        rows: 3,
        cols: 4,
        default_fee: 15.0,
    };
    let eval = evaluate(50.0, 0.5, &FeeTable::from_config(&grid).unwrap());

    assert_eq!(eval.slots.len(), 12);
    assert_eq!(eval.slots.last().map(|s| s.position.as_str()), Some("C4"));
    assert_eq!(eval.best, Some(0));
}

#[test]
fn test_evaluation_serializes_camel_case() {
    let eval = evaluate(100.0, 0.5, &FeeTable::uniform(1, 2, 20.0).unwrap());
    let value = serde_json::to_value(&eval).unwrap();

    assert_eq!(value["best"], json!(0));
    assert_eq!(value["maxProfit"], json!(30.0));
    assert_eq!(value["slots"][1]["position"], json!("A2"));
}

#[test]
fn test_later_cell_must_strictly_beat_earlier() {
    let table = FeeTable::from_rows(vec![vec![50.0, 10.0, 10.0, 5.0]]).unwrap();
    let eval = evaluate(40.0, 1.0, &table);

    assert_eq!(eval.best, Some(3));
    assert_eq!(eval.profitable().count(), 3);
    assert_eq!(FeeTable::from_rows(Vec::new()), Err(FeeTableError::Empty));
}
