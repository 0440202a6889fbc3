use chartpaint::core::Bounds;
use chartpaint::{OutputFormat, Painter, PainterOptions};

fn painter(width: i32, height: i32) -> Painter {
    Painter::new(PainterOptions::new(OutputFormat::Svg, width, height)).expect("valid painter")
}

fn size(cells: &indexmap::IndexMap<String, Painter>, name: &str) -> (i32, i32) {
    let cell = cells.get(name).unwrap_or_else(|| panic!("missing cell {name}"));
    (cell.width(), cell.height())
}

#[test]
fn grid_spans_split_the_parent() {
    let root = painter(600, 400);
    let cells = root
        .layout_by_grid(3, 3)
        .cell_at("header", 0, 0)
        .span(3, 1)
        .cell_at("sidebar", 0, 1)
        .span(1, 2)
        .cell_at("main", 1, 1)
        .span(2, 2)
        .build()
        .expect("grid layout");

    assert_eq!(size(&cells, "header"), (600, 133));
    assert_eq!(size(&cells, "sidebar"), (200, 267));
    assert_eq!(size(&cells, "main"), (400, 267));
    assert_eq!(cells["main"].bounds().left, 200);
    assert_eq!(cells["main"].bounds().top, 133);
}

#[test]
fn grid_cells_stay_inside_the_parent() {
    let root = painter(601, 401);
    let cells = root
        .layout_by_grid(4, 3)
        .cell_at("a", 0, 0)
        .cell_at("b", 3, 2)
        .cell_at("c", 1, 1)
        .span(3, 2)
        .build()
        .expect("grid layout");
    for cell in cells.values() {
        assert!(root.bounds().contains(cell.bounds()), "{:?}", cell.bounds());
    }
    assert_eq!(cells["b"].bounds().right, 601);
    assert_eq!(cells["b"].bounds().bottom, 401);
}

#[test]
fn grid_rejects_bad_input() {
    let root = painter(100, 100);
    let error = root.layout_by_grid(0, 2).build().expect_err("zero columns");
    assert!(error.to_string().contains("invalid grid dimensions"));

    let error = root
        .layout_by_grid(2, 2)
        .cell_at("a", 0, 0)
        .cell_at("a", 1, 1)
        .build()
        .expect_err("duplicate");
    assert!(error.to_string().contains("duplicate cell name"));

    let error = root
        .layout_by_grid(2, 2)
        .cell_at("negHeight", 0, 0)
        .span(1, -2)
        .build()
        .expect_err("negative span");
    assert!(
        error
            .to_string()
            .contains("cell 'negHeight' has invalid span (1, -2): spans must be positive")
    );

    let error = root
        .layout_by_grid(2, 2)
        .cell_at("wide", 1, 0)
        .span(2, 1)
        .build()
        .expect_err("overflowing span");
    assert!(error.to_string().contains("wide"));
}

#[test]
fn grid_offsets_shift_the_cell() {
    let root = painter(200, 200);
    let cells = root
        .layout_by_grid(2, 2)
        .cell_at("moved", 0, 0)
        .offset("10", "50%")
        .build()
        .expect("grid layout");
    let bounds = cells["moved"].bounds();
    assert_eq!(bounds.left, 10);
    assert_eq!(bounds.top, 50);
}

#[test]
fn rows_split_auto_heights() {
    let root = painter(300, 400);
    let cells = root
        .layout_by_rows()
        .height("20")
        .col("top", "")
        .row()
        .col("middle_a", "")
        .row()
        .col("middle_b", "")
        .row()
        .height("20")
        .col("bottom", "")
        .build()
        .expect("row layout");

    assert_eq!(size(&cells, "top"), (300, 20));
    assert_eq!(size(&cells, "middle_a"), (300, 180));
    assert_eq!(size(&cells, "middle_b"), (300, 180));
    assert_eq!(size(&cells, "bottom"), (300, 20));
    assert_eq!(cells["bottom"].bounds().top, 380);
}

#[test]
fn rows_split_columns_by_percent_and_gap() {
    let root = painter(400, 100);
    let cells = root
        .layout_by_rows()
        .col("left", "25%")
        .col_gap("20")
        .col("right", "")
        .build()
        .expect("row layout");
    assert_eq!(size(&cells, "left"), (100, 100));
    assert_eq!(size(&cells, "right"), (280, 100));
    assert_eq!(cells["right"].bounds().left, 120);
}

#[test]
fn rows_reject_overfull_percentages_and_duplicates() {
    let root = painter(400, 100);
    let error = root
        .layout_by_rows()
        .col("a", "60%")
        .col("b", "41%")
        .build()
        .expect_err("101%");
    assert!(error.to_string().contains("column percentages exceed 100%"));

    let error = root
        .layout_by_rows()
        .col("a", "")
        .row()
        .col("a", "")
        .build()
        .expect_err("duplicate");
    assert!(error.to_string().contains("duplicate cell name"));
}

#[test]
fn building_twice_gives_identical_boxes() {
    let root = painter(500, 300);
    let mut layout = root.layout_by_rows();
    layout
        .height("30%")
        .col("chart", "60%")
        .col("side", "")
        .row_gap("10")
        .row()
        .col("footer", "");
    let first = layout.build().expect("first build");
    let second = layout.build().expect("second build");
    let boxes = |cells: &indexmap::IndexMap<String, Painter>| -> Vec<Bounds> {
        cells.values().map(Painter::bounds).collect()
    };
    assert_eq!(boxes(&first), boxes(&second));
    assert_eq!(first.keys().collect::<Vec<_>>(), vec!["chart", "side", "footer"]);
}
