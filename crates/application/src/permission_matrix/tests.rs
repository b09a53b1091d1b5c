use std::collections::BTreeMap;

use proptest::prelude::*;

use darchiva_domain::{EntityType, PermissionLevel, PermissionMatrixRow};

use super::{
    CellEditor, MatrixSort, MatrixSortKey, MatrixView, export_csv, export_file_name, filter_rows,
};

fn row(id: &str, name: &str, levels: &[(&str, PermissionLevel)]) -> PermissionMatrixRow {
    PermissionMatrixRow {
        entity_type: EntityType::User,
        entity_id: id.to_owned(),
        entity_name: name.to_owned(),
        permissions: levels
            .iter()
            .map(|(resource, level)| ((*resource).to_owned(), *level))
            .collect::<BTreeMap<_, _>>(),
    }
}

fn names(rows: &[&PermissionMatrixRow]) -> Vec<String> {
    rows.iter().map(|row| row.entity_name.clone()).collect()
}

fn sample_rows() -> Vec<PermissionMatrixRow> {
    vec![
        row("u1", "carol", &[("documents", PermissionLevel::Read)]),
        row("u2", "Alice", &[("documents", PermissionLevel::Owner)]),
        row("u3", "bob", &[]),
    ]
}

#[test]
fn filter_is_case_insensitive_substring() {
    let rows = sample_rows();
    assert_eq!(names(&filter_rows(&rows, "AL")), vec!["Alice".to_owned()]);
    assert_eq!(filter_rows(&rows, "").len(), 3);
    assert!(filter_rows(&rows, "zed").is_empty());
}

#[test]
fn name_sort_ignores_case() {
    let rows = sample_rows();
    let view = MatrixView::default();
    assert_eq!(
        names(&view.process(&rows)),
        vec!["Alice".to_owned(), "bob".to_owned(), "carol".to_owned()]
    );
}

#[test]
fn resource_sort_ranks_missing_as_none() {
    let rows = sample_rows();
    let view = MatrixView {
        search: String::new(),
        sort: MatrixSort {
            key: MatrixSortKey::Resource("documents".to_owned()),
            descending: true,
        },
    };

    assert_eq!(
        names(&view.process(&rows)),
        vec!["Alice".to_owned(), "carol".to_owned(), "bob".to_owned()]
    );
}

#[test]
fn equal_levels_keep_input_order() {
    let rows = vec![
        row("u1", "zoe", &[("tags", PermissionLevel::Write)]),
        row("u2", "adam", &[("tags", PermissionLevel::Write)]),
        row("u3", "mia", &[("tags", PermissionLevel::Read)]),
    ];
    let view = MatrixView {
        search: String::new(),
        sort: MatrixSort {
            key: MatrixSortKey::Resource("tags".to_owned()),
            descending: false,
        },
    };

    assert_eq!(
        names(&view.process(&rows)),
        vec!["mia".to_owned(), "zoe".to_owned(), "adam".to_owned()]
    );
}

#[test]
fn clicking_columns_toggles_or_switches() {
    let mut sort = MatrixSort::default();
    sort.click_column(MatrixSortKey::Name);
    assert!(sort.descending);

    sort.click_column(MatrixSortKey::parse("billing"));
    assert_eq!(sort.key, MatrixSortKey::Resource("billing".to_owned()));
    assert!(sort.descending);

    sort.click_column(MatrixSortKey::parse("billing"));
    assert!(!sort.descending);
    assert_eq!(MatrixSortKey::parse("name"), MatrixSortKey::Name);
}

#[test]
fn choosing_a_level_emits_one_update_and_leaves_edit_mode() {
    let rows = sample_rows();
    let mut editor = CellEditor::default();
    assert!(editor.choose_level(PermissionLevel::Read).is_none());

    editor.select_cell(&rows[2], "tags");
    assert_eq!(editor.editing(), Some(("u3", "tags")));

    let update = editor.choose_level(PermissionLevel::Admin);
    assert!(matches!(
        update,
        Some(update) if update.entity_id == "u3"
            && update.resource == "tags"
            && update.level == PermissionLevel::Admin
            && update.entity_type == EntityType::User
    ));
    assert_eq!(editor.editing(), None);

    editor.select_cell(&rows[0], "billing");
    editor.cancel();
    assert!(editor.choose_level(PermissionLevel::Owner).is_none());
}

#[test]
fn csv_export_has_header_and_one_line_per_row() {
    let rows = vec![
        row(
            "u1",
            "Ada",
            &[
                ("documents", PermissionLevel::Owner),
                ("billing", PermissionLevel::Read),
            ],
        ),
        row("u2", "Lovelace, Countess", &[("tags", PermissionLevel::Write)]),
    ];

    let Ok(csv) = export_csv(&rows) else {
        panic!("export should succeed");
    };
    let lines: Vec<&str> = csv.lines().collect();

    assert_eq!(lines.len(), 3);
    assert_eq!(
        lines[0],
        "Entity,Type,Documents,Folders,Tags,Workflows,Scanning,Settings,Users,Billing"
    );
    assert_eq!(lines[1], "Ada,user,owner,none,none,none,none,none,none,read");
    assert_eq!(
        lines[2],
        "\"Lovelace, Countess\",user,none,none,write,none,none,none,none"
    );
}

#[test]
fn export_file_name_pluralizes_entity_type() {
    assert_eq!(
        export_file_name(EntityType::Group),
        "permission-matrix-groups.csv"
    );
    assert_eq!(
        export_file_name(EntityType::User),
        "permission-matrix-users.csv"
    );
}

fn level_strategy() -> impl Strategy<Value = PermissionLevel> {
    prop_oneof![
        Just(PermissionLevel::None),
        Just(PermissionLevel::Read),
        Just(PermissionLevel::Write),
        Just(PermissionLevel::Admin),
        Just(PermissionLevel::Owner),
    ]
}

fn rows_strategy() -> impl Strategy<Value = Vec<PermissionMatrixRow>> {
    prop::collection::vec(
        ("[a-zA-Z]{1,8}", prop::option::of(level_strategy())),
        0..12,
    )
    .prop_map(|entries| {
        entries
            .into_iter()
            .enumerate()
            .map(|(index, (name, level))| {
                let levels: Vec<(&str, PermissionLevel)> =
                    level.map(|level| ("documents", level)).into_iter().collect();
                row(&format!("u{index}"), &name, &levels)
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn filter_keeps_exactly_matching_rows(rows in rows_strategy(), query in "[a-zA-Z]{0,3}") {
        let kept = filter_rows(&rows, &query);
        let lowered = query.to_lowercase();
        let expected = rows
            .iter()
            .filter(|row| row.entity_name.to_lowercase().contains(&lowered))
            .count();

        prop_assert_eq!(kept.len(), expected);
        prop_assert!(kept.iter().all(|row| row.entity_name.to_lowercase().contains(&lowered)));
    }

    #[test]
    fn resource_sort_orders_by_rank(rows in rows_strategy(), descending in any::<bool>()) {
        let view = MatrixView {
            search: String::new(),
            sort: MatrixSort {
                key: MatrixSortKey::Resource("documents".to_owned()),
                descending,
            },
        };
        let ranks: Vec<u8> = view
            .process(&rows)
            .iter()
            .map(|row| row.level_for("documents").rank())
            .collect();

        let ordered = ranks.windows(2).all(|pair| {
            if descending { pair[0] >= pair[1] } else { pair[0] <= pair[1] }
        });
        prop_assert!(ordered);
        prop_assert_eq!(ranks.len(), rows.len());
    }
}
