// ==========================================
// 参考清单解析器测试
// ==========================================
// 测试目标: 表头分类、空值过滤、多列合并去重、空表错误
// ==========================================


use ngo_subsidy_ledger::{
    FormatError, ListName, NgoOptions, ReferenceListParser, Sheet, Workbook,
};
use test_helpers::{n, single_sheet, t};

fn list(lists: &ngo_subsidy_ledger::ReferenceLists, name: ListName) -> Vec<String> {
    lists.get(name).map(|v| v.to_vec()).unwrap_or_default()
}

#[test]
fn test_worker_and_region_columns() {
    let workbook = single_sheet(
        &["社工姓名", "區域"],
        &[&["王小美", "台北中心"], &["李大同", ""]],
    );
    let lists = ReferenceListParser.parse(&workbook).unwrap();

    assert_eq!(list(&lists, ListName::Workers), vec!["王小美", "李大同"]);
    assert_eq!(list(&lists, ListName::Regions), vec!["台北中心"]);
    assert!(!lists.contains(ListName::Clients));
    assert!(!lists.contains(ListName::Items));
    assert!(!lists.contains(ListName::Sources));
}

#[test]
fn test_all_five_lists() {
    let workbook = single_sheet(
        &["所屬單位", "社工", "個案姓名", "補助項目", "經費來源"],
        &[&["桃園中心", "呂予瑄", "許澤豫", "房租", "勸募"]],
    );
    let lists = ReferenceListParser.parse(&workbook).unwrap();

    assert_eq!(list(&lists, ListName::Regions), vec!["桃園中心"]);
    assert_eq!(list(&lists, ListName::Workers), vec!["呂予瑄"]);
    assert_eq!(list(&lists, ListName::Clients), vec!["許澤豫"]);
    assert_eq!(list(&lists, ListName::Items), vec!["房租"]);
    assert_eq!(list(&lists, ListName::Sources), vec!["勸募"]);
}

#[test]
fn test_english_headers_case_insensitive() {
    let workbook = single_sheet(
        &["SOCIAL WORKER", "region", "Client Name", "Subsidy Item", "Funding Source"],
        &[&["Amy", "North", "Bob", "Rent", "Rotary"]],
    );
    let lists = ReferenceListParser.parse(&workbook).unwrap();

    assert_eq!(list(&lists, ListName::Workers), vec!["Amy"]);
    assert_eq!(list(&lists, ListName::Regions), vec!["North"]);
    assert_eq!(list(&lists, ListName::Clients), vec!["Bob"]);
    assert_eq!(list(&lists, ListName::Items), vec!["Rent"]);
    assert_eq!(list(&lists, ListName::Sources), vec!["Rotary"]);
}

#[test]
fn test_header_only_sheet_yields_empty_lists() {
    let workbook = single_sheet(&["社工", "區域", "備註"], &[]);
    let lists = ReferenceListParser.parse(&workbook).unwrap();

    assert!(lists.contains(ListName::Workers));
    assert!(lists.contains(ListName::Regions));
    assert_eq!(list(&lists, ListName::Workers), Vec::<String>::new());
    assert_eq!(lists.names().count(), 2);
}

#[test]
fn test_sheet_without_rows_is_empty_error() {
    let workbook = Workbook::new(vec![Sheet::new("Sheet1", vec![])]);
    assert_eq!(ReferenceListParser.parse(&workbook), Err(FormatError::EmptySheet));
}

#[test]
fn test_workbook_without_sheets_is_empty_error() {
    let workbook = Workbook::new(vec![]);
    assert_eq!(ReferenceListParser.parse(&workbook), Err(FormatError::EmptySheet));
}

#[test]
fn test_unmatched_headers_are_ignored() {
    let workbook = single_sheet(&["備註", "電話", ""], &[&["x", "0912", "y"]]);
    let lists = ReferenceListParser.parse(&workbook).unwrap();
    assert!(lists.is_empty());
}

#[test]
fn test_columns_of_same_list_merge_distinct() {
    let workbook = single_sheet(
        &["區域", "所屬中心"],
        &[
            &["台北中心", "桃園中心"],
            &["新竹中心", "台北中心"],
            &["台北中心", ""],
        ],
    );
    let lists = ReferenceListParser.parse(&workbook).unwrap();

    // 先第一列全部，再第二列
    assert_eq!(
        list(&lists, ListName::Regions),
        vec!["台北中心", "新竹中心", "桃園中心"]
    );
}

#[test]
fn test_values_are_trimmed_and_numbers_stringified() {
    let grid = vec![
        vec![t("個案編號")],
        vec![t("  A001  ")],
        vec![n(1024.0)],
        vec![t("   ")],
    ];
    let workbook = Workbook::new(vec![Sheet::new("清單", grid)]);
    let lists = ReferenceListParser.parse(&workbook).unwrap();

    assert_eq!(list(&lists, ListName::Clients), vec!["A001", "1024"]);
}

#[test]
fn test_only_first_sheet_is_read() {
    let first = single_sheet(&["社工"], &[&["王小美"]]).sheets.remove(0);
    let second = single_sheet(&["區域"], &[&["台北中心"]]).sheets.remove(0);
    let workbook = Workbook::new(vec![first, second]);

    let lists = ReferenceListParser.parse(&workbook).unwrap();
    assert!(lists.contains(ListName::Workers));
    assert!(!lists.contains(ListName::Regions));
}

#[test]
fn test_merge_into_options_appends_new_values() {
    let workbook = single_sheet(&["經費來源"], &[&["聚陽實業"], &["新光人壽"]]);
    let lists = ReferenceListParser.parse(&workbook).unwrap();

    let mut options = NgoOptions::default();
    let before = options.sources.len();
    let added = options.merge_reference_lists(&lists);

    assert_eq!(added, 1);
    assert_eq!(options.sources.len(), before + 1);
    assert_eq!(options.sources.last().map(String::as_str), Some("新光人壽"));
}
