//! Table locator parsing for `starsync-notion`.

use rstest::rstest;
use starsync_core::TableError;
use starsync_notion::database_id;

const DASHED: &str = "0123abcd-4567-89ef-0123-456789abcdef";

#[rstest]
#[case("https://www.notion.so/me/Stars-0123abcd456789ef0123456789abcdef")]
#[case("https://www.notion.so/me/Stars-0123abcd456789ef0123456789abcdef?v=ffffffffffffffffffffffffffffffff")]
#[case("https://www.notion.so/0123abcd456789ef0123456789abcdef#section")]
#[case("https://www.notion.so/me/Stars-0123ABCD456789EF0123456789ABCDEF/")]
#[case("0123abcd456789ef0123456789abcdef")]
#[case("0123abcd-4567-89ef-0123-456789abcdef")]
#[case("  0123abcd456789ef0123456789abcdef  ")]
fn accepts_common_forms(#[case] locator: &str) {
    assert_eq!(database_id(locator).expect("valid locator"), DASHED);
}

#[rstest]
#[case("")]
#[case("https://www.notion.so/me/Stars")]
#[case("0123abcd456789ef0123456789abcdeg")]
#[case("not a url at all, but it is long enough to pass")]
fn rejects_garbage(#[case] locator: &str) {
    let err = database_id(locator).unwrap_err();
    assert!(matches!(err, TableError::InvalidLocator(ref l) if l == locator));
}
