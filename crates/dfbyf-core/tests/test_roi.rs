#[allow(dead_code)]
mod common;

use dfbyf_core::error::DfbyfError;
use dfbyf_core::roi::{load_rois, parse_rois, CircleMask, Roi};

#[test]
fn test_sorted_by_row_keeps_pairing() {
    let csv = "column,row,radius\n5,30,2\n7,10,3\n9,20,4\n";
    let rois = parse_rois(csv).unwrap();
    assert_eq!(
        rois,
        vec![
            Roi::new(7.0, 10.0, 3.0),
            Roi::new(9.0, 20.0, 4.0),
            Roi::new(5.0, 30.0, 2.0),
        ]
    );
}

#[test]
fn test_equal_rows_keep_file_order() {
    let csv = "c,r,rad\n1,5,1\n2,5,1\n3,1,1\n";
    let rois = parse_rois(csv).unwrap();
    let columns: Vec<f64> = rois.iter().map(|r| r.column).collect();
    assert_eq!(columns, vec![3.0, 1.0, 2.0]);
}

#[test]
fn test_comments_blank_lines_and_extra_columns() {
    let csv = "# header comment\n\
               # full-line comment\n\
               \n\
               10, 12, 3, 0.9, extra # trailing comment\n\
               4.5,2.5,1.5\n";
    let rois = parse_rois(csv).unwrap();
    assert_eq!(rois.len(), 2);
    assert_eq!(rois[0], Roi::new(4.5, 2.5, 1.5));
    assert_eq!(rois[1], Roi::new(10.0, 12.0, 3.0));
}

#[test]
fn test_header_only_is_empty() {
    assert!(parse_rois("column,row,radius\n").unwrap().is_empty());
    assert!(parse_rois("").unwrap().is_empty());
}

#[test]
fn test_short_row_reports_line() {
    let err = parse_rois("c,r,rad\n1,2,3\n4,5\n").unwrap_err();
    match err {
        DfbyfError::RoiParse { line, .. } => assert_eq!(line, 3),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_non_numeric_field_errors() {
    let err = parse_rois("c,r,rad\n1,two,3\n").unwrap_err();
    assert!(matches!(err, DfbyfError::RoiParse { line: 2, .. }));
}

#[test]
fn test_load_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_rois(&dir.path().join("missing.csv")).unwrap_err();
    assert!(matches!(err, DfbyfError::Io(_)));
}

#[test]
fn test_load_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rois.csv");
    common::write_roi_csv(&path, &[(1.0, 9.0, 2.0), (3.0, 4.0, 1.0)]);
    let rois = load_rois(&path).unwrap();
    assert_eq!(rois, vec![Roi::new(3.0, 4.0, 1.0), Roi::new(1.0, 9.0, 2.0)]);
}

#[test]
fn test_mask_pixel_count_radius_three() {
    let mask = CircleMask::new(&Roi::new(10.0, 10.0, 3.0), (32, 32));
    // Lattice points with dx^2 + dy^2 <= 9.
    assert_eq!(mask.len(), 29);
    assert!(mask.contains(10, 10));
    assert!(mask.contains(10, 13));
    assert!(mask.contains(7, 10));
    assert!(mask.contains(12, 12));
    assert!(!mask.contains(13, 12));
    assert_eq!(mask.shape(), (32, 32));
}

#[test]
fn test_mask_center_uses_row_as_x() {
    // column = 2 -> array row 2, row = 8 -> array column 8.
    let mask = CircleMask::new(&Roi::new(2.0, 8.0, 0.0), (10, 10));
    assert_eq!(mask.indices(), &[(2, 8)]);
}

#[test]
fn test_mask_truncates_center_and_radius() {
    let mask = CircleMask::new(&Roi::new(4.9, 4.9, 1.9), (10, 10));
    // Center (4, 4), radius 1: a plus shape.
    assert_eq!(mask.len(), 5);
    assert!(mask.contains(4, 4));
    assert!(mask.contains(3, 4));
    assert!(!mask.contains(5, 5));
}

#[test]
fn test_mask_clipped_at_border() {
    let mask = CircleMask::new(&Roi::new(0.0, 0.0, 2.0), (10, 10));
    // Quarter of the radius-2 disc (13 points) that lies in-frame.
    assert_eq!(mask.len(), 6);
    assert!(mask.indices().iter().all(|&(r, c)| r < 10 && c < 10));
}

#[test]
fn test_mask_outside_frame_is_empty() {
    let mask = CircleMask::new(&Roi::new(100.0, 100.0, 3.0), (10, 10));
    assert!(mask.is_empty());
}
