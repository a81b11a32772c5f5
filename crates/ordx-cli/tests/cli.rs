use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const PAGE: &str = r#"<html><body>
  <script>var x = "Total $999.99";</script>
  <p>Oct 19, 2025 Order# 200013456789</p>
  <h2>Delivered on Oct 20</h2>
  <p>Delivery from store, 2 items</p>
  <div data-testid="itemtile-stack">
    <span data-testid="productName">Pasta</span>
    <span class="bill-item-quantity">Qty 2</span>
    <span data-testid="line-price">$1.97</span>
  </div>
  <p>Subtotal $75.71</p>
  <p>Multisave Discount $0.76</p>
  <p>Taxes $5.00</p>
  <p>Total $80.71</p>
  <p>Payment method Visa Ending in 1529</p>
</body></html>"#;

/// Command bound to a config file inside the temp dir, so the user's own
/// configuration never leaks in.
fn ordx(dir: &Path) -> Command {
    let config = dir.join("config.json");
    if !config.exists() {
        fs::write(&config, "{}").unwrap();
    }
    let mut cmd = Command::cargo_bin("ordx").unwrap();
    cmd.arg("--config").arg(&config);
    cmd.env_remove("ORDX_SUBJECT_FILTER")
        .env_remove("ORDX_ORDER_URL_TEMPLATE")
        .env_remove("ORDX_OUTPUT_DIR");
    cmd
}

#[test]
fn parse_html_page_as_text() {
    let dir = TempDir::new().unwrap();
    let page = dir.path().join("200013456789.html");
    fs::write(&page, PAGE).unwrap();

    ordx(dir.path())
        .arg("parse")
        .arg(&page)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Order: 200013456789\nURL: https://www.walmart.ca/en/orders/200013456789\nDate: Oct 20, 2025\nPayment: ****1529\n",
        ))
        .stdout(predicate::str::contains(
            "Subtotal: 75.71\nDiscount: -0.76\nDelivery: 0.00\nTaxes: 5.00\nTotal: 80.71\nItems:\n- Pasta | Qty: 2 | Price: 1.97",
        ));
}

#[test]
fn parse_text_page_as_json() {
    let dir = TempDir::new().unwrap();
    let page = dir.path().join("page.txt");
    fs::write(
        &page,
        "Subtotal $100.00 Multisave Discount $2.50 Savings $1.25 Taxes $6.00 Total $102.25",
    )
    .unwrap();

    ordx(dir.path())
        .args(["parse", "--order", "42", "--url", "https://example.com/42", "-f", "json"])
        .arg(&page)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""discount": "-3.75""#))
        .stdout(predicate::str::contains(r#""order_id": "42""#));
}

#[test]
fn parse_missing_file_fails() {
    let dir = TempDir::new().unwrap();
    ordx(dir.path())
        .args(["parse", "nope.html"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn batch_writes_one_summary_per_page() {
    let dir = TempDir::new().unwrap();
    let pages = dir.path().join("pages");
    let out = dir.path().join("out");
    fs::create_dir_all(&pages).unwrap();
    fs::write(pages.join("111.html"), PAGE).unwrap();
    fs::write(pages.join("222.txt"), "Subtotal $10.00 Delivery fee $5.00 Total $15.00").unwrap();

    ordx(dir.path())
        .arg("batch")
        .arg(pages.join("*").to_string_lossy().to_string())
        .arg("-o")
        .arg(&out)
        .args(["-j", "2", "--summary", "--write-html"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 successful"));

    let first = fs::read_to_string(out.join("111.txt")).unwrap();
    assert!(first.starts_with("Order: 111\n"));
    assert!(first.contains("Total: 80.71"));
    assert!(out.join("111.html").exists());

    let second = fs::read_to_string(out.join("222.txt")).unwrap();
    assert!(second.contains("Delivery: 5.00"));
    assert!(!out.join("222.html").exists());

    let summary = fs::read_to_string(out.join("summary.csv")).unwrap();
    assert_eq!(summary.lines().count(), 3);
    assert!(summary.starts_with("filename,status,order_id,"));
}

#[test]
fn batch_leaves_pages_already_in_output_dir_intact() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("out");
    fs::create_dir_all(&out).unwrap();
    fs::write(out.join("123.html"), PAGE).unwrap();

    ordx(dir.path())
        .current_dir(dir.path())
        .args(["batch", "out/*.html", "-o", "./out", "--write-html"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 successful"));

    assert_eq!(fs::read_to_string(out.join("123.html")).unwrap(), PAGE);
    let summary = fs::read_to_string(out.join("123.txt")).unwrap();
    assert!(summary.contains("Total: 80.71"));
}

#[test]
fn links_lists_unique_orders() {
    let dir = TempDir::new().unwrap();
    let messages = dir.path().join("messages.json");
    fs::write(
        &messages,
        r#"[
          {"subject": "Your Walmart order was delivered", "received": "2025-10-20T09:00:00",
           "html_body": "<a href=\"https://www.walmart.ca/en/orders/300000000002\">View</a>"},
          {"subject": "Your Walmart order was delivered", "received": "2025-10-21T09:00:00",
           "text_body": "https%3A%2F%2Fwww.walmart.ca%2Fen%2Forders%2F100000000001"},
          {"subject": "Your Walmart order was delivered", "received": "2025-11-02T09:00:00",
           "text_body": "https://www.walmart.ca/en/orders/500000000005"},
          {"subject": "Flyer", "text_body": "https://www.walmart.ca/en/orders/999"}
        ]"#,
    )
    .unwrap();

    ordx(dir.path())
        .arg("links")
        .arg(&messages)
        .args(["--period", "2025-10"])
        .assert()
        .success()
        .stdout(predicate::eq(
            "100000000001\thttps://www.walmart.ca/en/orders/100000000001\n\
             300000000002\thttps://www.walmart.ca/en/orders/300000000002\n",
        ));
}

#[test]
fn links_rejects_bad_period() {
    let dir = TempDir::new().unwrap();
    let messages = dir.path().join("messages.json");
    fs::write(&messages, "[]").unwrap();

    ordx(dir.path())
        .arg("links")
        .arg(&messages)
        .args(["--period", "2025-13"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid period"));
}

#[test]
fn config_set_then_get() {
    let dir = TempDir::new().unwrap();

    ordx(dir.path())
        .args(["config", "set", "extraction.payment_window", "200"])
        .assert()
        .success();

    ordx(dir.path())
        .args(["config", "get", "extraction.payment_window"])
        .assert()
        .success()
        .stdout(predicate::str::contains("200"));

    ordx(dir.path())
        .args(["config", "set", "extraction.no_such_key", "1"])
        .assert()
        .failure();
}
