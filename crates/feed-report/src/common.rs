//! Shared helpers for feed serialization.

use std::borrow::Cow;
use std::io::Write;

use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::Result;

/// Yandex realty feed namespace.
pub const REALTY_FEED_NS: &str = "http://webmaster.yandex.ru/schemas/feed/realty/2010-06";

/// Root element name.
pub const ROOT_ELEMENT: &str = "realty-feed";

pub const DEFAULT_COUNTRY: &str = "Россия";
pub const DEFAULT_DEAL_TYPE: &str = "продажа";
pub const DEFAULT_AREA_UNIT: &str = "кв. м";

/// Render a decimal with exactly two fractional digits, no grouping.
pub fn format_decimal(value: Decimal) -> String {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    if rounded.is_zero() {
        rounded.set_sign_positive(true);
    }
    rounded.to_string()
}

fn is_xml_char(ch: char) -> bool {
    matches!(ch, '\t' | '\n' | '\r') || (ch >= ' ' && ch != '\u{fffe}' && ch != '\u{ffff}')
}

/// Drop characters XML 1.0 cannot represent, even escaped.
pub fn xml_safe(text: &str) -> Cow<'_, str> {
    if text.chars().all(is_xml_char) {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(text.chars().filter(|ch| is_xml_char(*ch)).collect())
    }
}

/// Write `<name>text</name>`.
pub fn write_text_element<W: Write>(writer: &mut Writer<W>, name: &str, text: &str) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(&xml_safe(text))))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

/// Write a text element only when a value is present.
pub fn write_optional_element<W: Write>(
    writer: &mut Writer<W>,
    name: &str,
    text: Option<&str>,
) -> Result<()> {
    match text {
        Some(text) => write_text_element(writer, name, text),
        None => Ok(()),
    }
}

/// Write `<name><value>…</value><unit>…</unit></name>`.
pub fn write_measure<W: Write>(
    writer: &mut Writer<W>,
    name: &str,
    value: Decimal,
    unit: &str,
) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    write_text_element(writer, "value", &format_decimal(value))?;
    write_text_element(writer, "unit", unit)?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}
