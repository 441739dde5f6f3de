use crate::store::Operator;
use crate::store::OrderDirection;
use crate::store::Page;

#[test]
fn operator_parses_sql_spellings() {
    assert_eq!(Operator::parse("="), Some(Operator::Eq));
    assert_eq!(Operator::parse("!="), Some(Operator::Neq));
    assert_eq!(Operator::parse("<>"), Some(Operator::Neq));
    assert_eq!(Operator::parse(">="), Some(Operator::Gte));
    assert_eq!(Operator::parse(" LIKE "), Some(Operator::Like));
    assert_eq!(Operator::parse("not like"), Some(Operator::NotLike));
    assert_eq!(Operator::parse("~"), None);
}

#[test]
fn order_direction_is_case_insensitive() {
    assert_eq!(OrderDirection::parse("asc"), Some(OrderDirection::Asc));
    assert_eq!(OrderDirection::parse("DESC"), Some(OrderDirection::Desc));
    assert_eq!(OrderDirection::parse("down"), None);
}

#[test]
fn last_page_rounds_up() {
    let page = Page {
        current_page: 1,
        items: vec![],
        per_page: 2,
        total: 5,
    };
    assert_eq!(page.last_page(), 3);
    assert!(page.has_more_pages());
}

#[test]
fn empty_page_has_one_last_page() {
    let page = Page {
        current_page: 1,
        items: vec![],
        per_page: 0,
        total: 7,
    };
    assert_eq!(page.last_page(), 1);
    assert!(!page.has_more_pages());
}

#[test]
fn offset_counts_items_on_earlier_pages() {
    assert_eq!(Page::offset(1, 10), Some(0));
    assert_eq!(Page::offset(0, 10), Some(0));
    assert_eq!(Page::offset(3, 10), Some(20));
}

#[test]
fn offset_past_the_addressable_range_is_none() {
    assert_eq!(Page::offset(u64::MAX, 2), None);
    assert_eq!(Page::offset(u64::MAX, 0), Some(0));
}
