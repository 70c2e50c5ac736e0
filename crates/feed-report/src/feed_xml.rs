//! Realty XML feed generation.
//!
//! The document mirrors the catalog tree: one `<complex>` per complex, one
//! `<building>` per building and one `<offer>` per unit, in insertion order.
//! Absent optional values produce no element at all.

use std::io::Write;

use chrono::{DateTime, SecondsFormat, Utc};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use tracing::{debug, info_span};

use feed_model::{Building, Catalog, Complex, Diagnostic, Severity, Unit};

use crate::common::{
    DEFAULT_AREA_UNIT, DEFAULT_COUNTRY, DEFAULT_DEAL_TYPE, REALTY_FEED_NS, ROOT_ELEMENT,
    format_decimal, write_measure, write_optional_element, write_text_element, xml_safe,
};
use crate::error::{FeedError, Result};

/// Options for feed generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedOptions {
    /// Render attached diagnostics as `<diagnostic>` elements.
    pub verbose: bool,
    /// Value of `<generation-date>`; the element is omitted when `None`.
    pub generation_date: Option<DateTime<Utc>>,
    pub country: String,
    /// Value of every offer's `<type>`.
    pub deal_type: String,
    pub area_unit: String,
    /// Spaces per nesting level; `0` writes a single line.
    pub indent: usize,
}

impl Default for FeedOptions {
    fn default() -> Self {
        Self {
            verbose: false,
            generation_date: None,
            country: DEFAULT_COUNTRY.to_string(),
            deal_type: DEFAULT_DEAL_TYPE.to_string(),
            area_unit: DEFAULT_AREA_UNIT.to_string(),
            indent: 2,
        }
    }
}

/// Serialize a validated catalog into feed bytes.
///
/// Fails with [`FeedError::BlockingIssues`] if any node still carries an
/// error-severity diagnostic. Performs no I/O.
pub fn generate(catalog: &Catalog, options: &FeedOptions) -> Result<Vec<u8>> {
    let span = info_span!("generate_feed", units = catalog.unit_count());
    let _guard = span.enter();

    let blocking = catalog
        .diagnostics()
        .iter()
        .filter(|(_, diagnostic)| diagnostic.severity == Severity::Error)
        .count();
    if blocking > 0 {
        return Err(FeedError::BlockingIssues { count: blocking });
    }

    let mut xml = if options.indent > 0 {
        Writer::new_with_indent(Vec::new(), b' ', options.indent)
    } else {
        Writer::new(Vec::new())
    };
    xml.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut root = BytesStart::new(ROOT_ELEMENT);
    root.push_attribute(("xmlns", REALTY_FEED_NS));
    xml.write_event(Event::Start(root))?;

    if let Some(date) = options.generation_date {
        write_text_element(
            &mut xml,
            "generation-date",
            &date.to_rfc3339_opts(SecondsFormat::Secs, true),
        )?;
    }

    for complex in &catalog.complexes {
        write_complex(&mut xml, complex, options)?;
    }

    xml.write_event(Event::End(BytesEnd::new(ROOT_ELEMENT)))?;

    let bytes = xml.into_inner();
    debug!(bytes = bytes.len(), "feed generated");
    Ok(bytes)
}

fn write_complex<W: Write>(
    xml: &mut Writer<W>,
    complex: &Complex,
    options: &FeedOptions,
) -> Result<()> {
    let mut node = BytesStart::new("complex");
    if !complex.is_implicit() {
        node.push_attribute(("name", &*xml_safe(&complex.name)));
    }
    xml.write_event(Event::Start(node))?;
    for building in &complex.buildings {
        write_building(xml, building, options)?;
    }
    write_diagnostics(xml, &complex.diagnostics, options)?;
    xml.write_event(Event::End(BytesEnd::new("complex")))?;
    Ok(())
}

fn write_building<W: Write>(
    xml: &mut Writer<W>,
    building: &Building,
    options: &FeedOptions,
) -> Result<()> {
    let mut node = BytesStart::new("building");
    if !building.is_implicit() {
        node.push_attribute(("name", &*xml_safe(&building.name)));
    }
    let floors_total = building.floors_total.as_ref().map(ToString::to_string);
    if let Some(total) = floors_total.as_deref() {
        node.push_attribute(("floors-total", total));
    }
    xml.write_event(Event::Start(node))?;
    for unit in &building.units {
        write_offer(xml, unit, building, floors_total.as_deref(), options)?;
    }
    write_diagnostics(xml, &building.diagnostics, options)?;
    xml.write_event(Event::End(BytesEnd::new("building")))?;
    Ok(())
}

fn write_offer<W: Write>(
    xml: &mut Writer<W>,
    unit: &Unit,
    building: &Building,
    floors_total: Option<&str>,
    options: &FeedOptions,
) -> Result<()> {
    let record = &unit.record;
    let mut node = BytesStart::new("offer");
    if let Some(id) = record.internal_id.as_deref() {
        node.push_attribute(("internal-id", &*xml_safe(id)));
    }
    xml.write_event(Event::Start(node))?;

    write_text_element(xml, "type", &options.deal_type)?;
    write_optional_element(xml, "property-type", record.property_type.as_deref())?;
    write_optional_element(xml, "category", record.category.as_deref())?;

    xml.write_event(Event::Start(BytesStart::new("location")))?;
    write_text_element(xml, "country", &options.country)?;
    write_optional_element(xml, "address", record.address.as_deref())?;
    if let Some(station) = record.metro_station.as_deref() {
        xml.write_event(Event::Start(BytesStart::new("metro")))?;
        write_text_element(xml, "name", station)?;
        xml.write_event(Event::End(BytesEnd::new("metro")))?;
    }
    xml.write_event(Event::End(BytesEnd::new("location")))?;

    if let Some(price) = &record.price {
        xml.write_event(Event::Start(BytesStart::new("price")))?;
        write_text_element(xml, "value", &format_decimal(price.value))?;
        write_text_element(xml, "currency", &price.currency)?;
        xml.write_event(Event::End(BytesEnd::new("price")))?;
    }
    write_optional_element(
        xml,
        "price-sale",
        record.price_sale.map(format_decimal).as_deref(),
    )?;
    if let Some(area) = record.area_total {
        write_measure(xml, "area", area, &options.area_unit)?;
    }
    if let Some(area) = record.area_living {
        write_measure(xml, "living-space", area, &options.area_unit)?;
    }
    if let Some(area) = record.area_kitchen {
        write_measure(xml, "kitchen-space", area, &options.area_unit)?;
    }

    let integer = |value: Option<i32>| value.as_ref().map(ToString::to_string);
    write_optional_element(xml, "rooms", integer(record.rooms).as_deref())?;
    write_optional_element(xml, "floor", integer(record.floor).as_deref())?;
    write_optional_element(xml, "floors-total", floors_total)?;
    if !building.is_implicit() {
        write_text_element(xml, "building-name", &building.name)?;
    }
    write_optional_element(xml, "built-year", integer(record.built_year).as_deref())?;
    write_optional_element(
        xml,
        "ceiling-height",
        record.ceiling_height.map(format_decimal).as_deref(),
    )?;
    write_optional_element(xml, "renovation", record.renovation.as_deref())?;
    write_optional_element(xml, "window-view", record.windows_view.as_deref())?;
    write_optional_element(xml, "apartment-number", record.apartment_number.as_deref())?;
    write_optional_element(xml, "description", record.description.as_deref())?;

    for image in &record.images {
        write_text_element(xml, "image", image)?;
    }
    write_diagnostics(xml, &unit.diagnostics, options)?;

    xml.write_event(Event::End(BytesEnd::new("offer")))?;
    Ok(())
}

fn write_diagnostics<W: Write>(
    xml: &mut Writer<W>,
    diagnostics: &[Diagnostic],
    options: &FeedOptions,
) -> Result<()> {
    if !options.verbose {
        return Ok(());
    }
    for diagnostic in diagnostics {
        let mut node = BytesStart::new("diagnostic");
        node.push_attribute(("severity", diagnostic.severity.label()));
        node.push_attribute(("kind", diagnostic.kind.code()));
        xml.write_event(Event::Start(node))?;
        xml.write_event(Event::Text(BytesText::new(&xml_safe(&diagnostic.message))))?;
        xml.write_event(Event::End(BytesEnd::new("diagnostic")))?;
    }
    Ok(())
}
