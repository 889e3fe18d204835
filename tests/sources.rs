// tests/sources.rs
mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{FakeClient, options, read};
use derby_names::config::RdrOptions;
use derby_names::config::consts::{RDN_SITEMAP_URL, TWOEVILS_URL};
use derby_names::error::FetchError;
use derby_names::progress::NullProgress;
use derby_names::sources::{Fetcher, SiteFetcher, Source, rdr};
use derby_names::tasks::{TaskId, TaskStatus};
use derby_names::Pipeline;

fn letter_page(names: &[&str]) -> String {
    let items: String = names.iter().map(|n| format!("<li><a href=\"/n/{n}\">{n}</a></li>")).collect();
    format!("<ul class=\"nav\"><li><a href=\"/\">Home</a></li></ul><ul>{items}</ul>")
}

fn fetcher(site: Source, client: FakeClient, letters: &str) -> SiteFetcher {
    SiteFetcher::new(site, Arc::new(client), RdrOptions::new(letters).unwrap()).with_pause(Duration::ZERO)
}

#[test]
fn rdr_timeout_skips_the_letter() {
    let mut client = FakeClient::default();
    client.pages.insert(rdr::letter_url('A'), letter_page(&["Abby Normal", "Axe Grinder"]));
    client.timeouts.push(rdr::letter_url('B'));

    let t = fetcher(Source::Rdr, client, "AB").fetch().unwrap();
    assert_eq!(t.len(), 2);
    let names: Vec<_> = t.values(0).flatten().collect();
    assert_eq!(names, ["Abby Normal", "Axe Grinder"]);
}

#[test]
fn rdr_other_failures_fail_the_source() {
    let mut client = FakeClient::default();
    client.pages.insert(rdr::letter_url('A'), letter_page(&["Abby Normal"]));
    // B is a 404

    let err = fetcher(Source::Rdr, client, "AB").fetch().unwrap_err();
    assert!(matches!(err, FetchError::Status { status: 404, .. }));
}

#[test]
fn rdr_partial_result_still_commits() {
    let dir = tempfile::tempdir().unwrap();
    let mut client = FakeClient::default();
    client.pages.insert(rdr::letter_url('A'), letter_page(&["Abby Normal"]));
    client.timeouts.push(rdr::letter_url('B'));

    let site: Arc<dyn Fetcher> = Arc::new(fetcher(Source::Rdr, client, "AB"));
    let report = Pipeline::new(options(dir.path()), [site])
        .run(&[TaskId::Scrape(Source::Rdr)], &mut NullProgress)
        .unwrap();

    assert!(matches!(report.status(TaskId::Scrape(Source::Rdr)), Some(TaskStatus::Completed { .. })));
    assert_eq!(
        read(dir.path().join("rollerderbyroster.csv")),
        format!("Name,url\nAbby Normal,{}\n", rdr::letter_url('A'))
    );
}

#[test]
fn rdn_crawls_nested_sitemaps_and_skips_bad_leagues() {
    let nested = "https://rdnation.com/sitemap-2.xml";
    let good = "https://rdnation.com/roller-derby-league/1/gotham";
    let broken = "https://rdnation.com/roller-derby-league/2/broken";

    let mut client = FakeClient::default();
    client.pages.insert(
        RDN_SITEMAP_URL.to_string(),
        format!(
            "<sitemapindex><sitemap><loc>{nested}</loc></sitemap></sitemapindex>\
             <urlset><url><loc>https://rdnation.com/about</loc></url></urlset>"
        ),
    );
    client.pages.insert(
        nested.to_string(),
        format!("<urlset><url><loc>{good}</loc></url><url><loc>{broken}</loc></url></urlset>"),
    );
    client.pages.insert(
        good.to_string(),
        "<table><tr><th>Derby Name</th><th>Number</th></tr>\
         <tr><td>Suzy Hotrod</td><td>77</td></tr>\
         <tr><td>Bonnie Thunders</td><td>340</td></tr></table>"
            .to_string(),
    );
    // `broken` is a 404

    let t = fetcher(Source::Rdn, client, "A").fetch().unwrap();
    assert_eq!(t.headers(), ["Name", "Number", "url"]);
    assert_eq!(t.len(), 2);
    assert_eq!(t.cell(0, 0), Some("Suzy Hotrod"));
    assert_eq!(t.cell(1, 2), Some(good));
}

#[test]
fn rdn_without_root_sitemap_fails() {
    let err = fetcher(Source::Rdn, FakeClient::default(), "A").fetch().unwrap_err();
    assert!(matches!(err, FetchError::Status { .. }));
}

#[test]
fn twoevils_register_through_the_fetcher() {
    let mut client = FakeClient::default();
    client.pages.insert(
        TWOEVILS_URL.to_string(),
        "<table>\
           <tr><td colspan=\"4\">Master Roster</td></tr>\
           <tr><td>Skater Name</td><td>Number</td><td>Date Added</td><td>League</td></tr>\
           <tr><td>Anna Mosity</td><td>13</td><td>2009-01-02</td><td>Gotham</td></tr>\
           <tr><td>Bea &amp; Rage</td><td>0</td><td>2010-05-06</td><td>Rose City</td></tr>\
           <tr><td>Totals</td><td></td><td></td><td></td></tr>\
         </table>"
            .to_string(),
    );

    let t = fetcher(Source::Twoevils, client, "A").fetch().unwrap();
    assert_eq!(t.headers(), ["Name", "Number", "Registered", "League"]);
    assert_eq!(t.len(), 2);
    assert_eq!(t.cell(1, 0), Some("Bea & Rage"));
}
