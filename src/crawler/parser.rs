//! HTML parser for extracting job listings
//!
//! This module turns one listing page into structured records:
//! - Listing anchors are found anywhere in the document
//! - Each anchor's enclosing table row supplies the remaining fields
//! - A heuristic decides whether a further page exists
//!
//! The board's markup carries no classes or ids on the listing rows, so
//! extraction leans on the row layout and the shape of detail links.

use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use url::Url;

// Row layout contract (observed on the live board): cell 0 holds the
// favorite-star image whose id mirrors the listing id, cell 2 the company
// logo, cell 4 the published date, cell 5 the application deadline.
const ID_FALLBACK_CELL: usize = 0;
const LOGO_CELL: usize = 2;
const PUBLISHED_CELL: usize = 4;
const DEADLINE_CELL: usize = 5;

/// Longest company name accepted from an in-row company link
const MAX_COMPANY_CHARS: usize = 80;

/// One listing extracted from a listing page, fields still raw
#[derive(Debug, Clone, PartialEq)]
pub struct RawListing {
    /// Anchor text of the detail link
    pub title: String,
    /// Absolute URL of the detail page
    pub url: String,
    /// Company name; empty when no plausible company link was found
    pub company: String,
    /// Source-assigned listing id, if one could be resolved
    pub external_id: Option<i64>,
    /// Published date cell text, verbatim
    pub published_raw: String,
    /// Deadline date cell text, verbatim
    pub deadline_raw: String,
    /// Absolute company logo URL, if the row carries one
    pub company_img_url: Option<String>,
}

/// Extracted information from one listing page
#[derive(Debug, Clone)]
pub struct ParsedPage {
    /// Listings in document order
    pub listings: Vec<RawListing>,
    /// Whether the page signals a further page of results
    pub has_next: bool,
}

/// Parses one listing page
///
/// # Extraction Rules
///
/// **Include:** every anchor whose href targets a listing detail page,
/// deduplicated by absolute URL, first occurrence wins.
///
/// **Skip silently:**
/// - Anchors with empty link text (decorative duplicates of real links)
/// - Anchors outside any table row (navigation, footers)
/// - Company links, which carry an id parameter of their own
///
/// A page with no listing anchors produces an empty extraction, not an
/// error.
///
/// # Arguments
///
/// * `html` - The page HTML
/// * `base_url` - Base for absolutizing relative detail and image links
pub fn parse_listing_page(html: &str, base_url: &Url) -> ParsedPage {
    let document = Html::parse_document(html);

    let listings = extract_listings(&document, base_url);
    let has_next = detect_next_page(&document);

    ParsedPage { listings, has_next }
}

/// Extracts all listings from the document
fn extract_listings(document: &Html, base_url: &Url) -> Vec<RawListing> {
    let mut listings = Vec::new();
    let mut seen_urls = HashSet::new();

    let anchor_selector = match Selector::parse("a[href]") {
        Ok(s) => s,
        Err(_) => return listings,
    };
    let cell_selector = match Selector::parse("td") {
        Ok(s) => s,
        Err(_) => return listings,
    };
    let image_selector = match Selector::parse("img") {
        Ok(s) => s,
        Err(_) => return listings,
    };
    let company_selector = match Selector::parse("a[href*='view=client']") {
        Ok(s) => s,
        Err(_) => return listings,
    };

    for anchor in document.select(&anchor_selector) {
        let href = match anchor.value().attr("href") {
            Some(h) => h,
            None => continue,
        };

        if !is_listing_href(href) {
            continue;
        }

        let url = match base_url.join(href) {
            Ok(u) => u.to_string(),
            Err(_) => continue,
        };
        if !seen_urls.insert(url.clone()) {
            continue;
        }

        let title = collect_text(&anchor);
        if title.is_empty() {
            continue;
        }

        let row = match enclosing_row(&anchor) {
            Some(r) => r,
            None => {
                tracing::trace!("Listing anchor outside a table row, skipping: {}", url);
                continue;
            }
        };

        let cells: Vec<ElementRef> = row.select(&cell_selector).collect();

        let external_id = extract_listing_id(href).or_else(|| {
            cells
                .get(ID_FALLBACK_CELL)
                .and_then(|cell| cell.select(&image_selector).next())
                .and_then(|img| img.value().attr("id"))
                .and_then(|id| id.trim().parse::<i64>().ok())
        });

        let company = row
            .select(&company_selector)
            .map(|link| collect_text(&link))
            .find(|text| !text.is_empty() && text.chars().count() <= MAX_COMPANY_CHARS)
            .unwrap_or_default();

        let company_img_url = cells
            .get(LOGO_CELL)
            .and_then(|cell| cell.select(&image_selector).next())
            .and_then(|img| img.value().attr("src"))
            .and_then(|src| base_url.join(src).ok())
            .map(|u| u.to_string());

        listings.push(RawListing {
            title,
            url,
            company,
            external_id,
            published_raw: cell_text(&cells, PUBLISHED_CELL),
            deadline_raw: cell_text(&cells, DEADLINE_CELL),
            company_img_url,
        });
    }

    listings
}

/// Decides whether the page signals a further page of results
///
/// Checks run from most to least specific and short-circuit. The markup
/// carries no reliable pagination contract, so the last resort is any
/// link with a numeric page parameter. A false positive costs one extra
/// fetch of an empty page, which the crawl loop absorbs.
fn detect_next_page(document: &Html) -> bool {
    if let Ok(selector) = Selector::parse("a[rel='next']") {
        if document.select(&selector).next().is_some() {
            return true;
        }
    }

    if let Ok(selector) = Selector::parse(".pagination a") {
        for link in document.select(&selector) {
            let text = link.text().collect::<String>();
            if text.contains("შემდეგი") || text.contains("Next") {
                return true;
            }
        }
    }

    if let Ok(selector) = Selector::parse("a.page_next, a.next") {
        if document.select(&selector).next().is_some() {
            return true;
        }
    }

    if let Ok(selector) = Selector::parse("a[href]") {
        for link in document.select(&selector) {
            if link
                .value()
                .attr("href")
                .map(has_page_parameter)
                .unwrap_or(false)
            {
                return true;
            }
        }
    }

    false
}

/// True when an anchor's href targets a listing detail page
///
/// Job links carry `view=jobs`, usually with `&id=N`; some markup
/// variants drop the view marker and surface only `&id=N`. Company links
/// carry an id parameter too but are a different kind of page.
fn is_listing_href(href: &str) -> bool {
    if href.contains("view=client") {
        return false;
    }
    href.contains("view=jobs") || extract_listing_id(href).is_some()
}

/// Extracts the numeric listing id from a detail href
fn extract_listing_id(href: &str) -> Option<i64> {
    let tail = if let Some((_, rest)) = href.split_once("view=jobs&id=") {
        rest
    } else if let Some((_, rest)) = href.split_once("&id=") {
        rest
    } else {
        return None;
    };

    let digits: String = tail.chars().take_while(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }

    digits.parse::<i64>().ok()
}

/// True when an href carries a numeric `page=` parameter
fn has_page_parameter(href: &str) -> bool {
    match href.split_once("page=") {
        Some((_, rest)) => rest
            .chars()
            .next()
            .map(|c| c.is_ascii_digit())
            .unwrap_or(false),
        None => false,
    }
}

/// Nearest enclosing table row of an element
fn enclosing_row<'a>(element: &ElementRef<'a>) -> Option<ElementRef<'a>> {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == "tr")
}

/// Trimmed text content of an element
fn collect_text(element: &ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Trimmed text of the nth cell, empty when the row is too short
fn cell_text(cells: &[ElementRef], idx: usize) -> String {
    cells.get(idx).map(collect_text).unwrap_or_default()
}
