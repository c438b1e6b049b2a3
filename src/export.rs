//! Admin export: the curated dataset as a source file.
//!
//! The deployed site reads its events from a hand-maintained TypeScript data
//! module. After curating, the admin exports the live state in that same shape
//! and commits it, so the next deploy ships the new lists as built-in data.
//!
//! Every string is written as a JSON string literal, which is also a valid
//! TypeScript literal, so quotes and backslashes in URLs survive verbatim.
//! Each URL gets its own line.

use crate::types::Event;

const HEADER: &str = "\
// Generated by crusade-gallery export. Replace src/data/images.ts with this
// file and redeploy to publish the curated image lists.

export type DayId = \"day1\" | \"day2\" | \"day3\" | \"day4\";

export interface CrusadeData {
  id: string;
  name: string;
  location: string;
  startDate: string;
  endDate: string;
  dayCount: number;
  images: Partial<Record<DayId, string[]>>;
}
";

const FOOTER: &str = "\
export const getAllCrusades = (): CrusadeData[] => CRUSADES;

export const getCrusadeById = (id: string): CrusadeData | undefined =>
  CRUSADES.find((crusade) => crusade.id === id);
";

/// Render the events, in order, as a TypeScript data module.
///
/// Every stored day slot is written, including slots past `day_count`.
pub fn render_data_module(events: &[Event]) -> String {
    let mut out = String::from(HEADER);
    out.push('\n');
    out.push_str("export const CRUSADES: CrusadeData[] = [\n");
    for event in events {
        write_event(&mut out, event);
    }
    out.push_str("];\n\n");
    out.push_str(FOOTER);
    out
}

fn write_event(out: &mut String, event: &Event) {
    out.push_str("  {\n");
    out.push_str(&format!("    id: {},\n", literal(&event.id)));
    out.push_str(&format!("    name: {},\n", literal(&event.name)));
    out.push_str(&format!("    location: {},\n", literal(&event.location)));
    out.push_str(&format!("    startDate: {},\n", literal(&event.start_date)));
    out.push_str(&format!("    endDate: {},\n", literal(&event.end_date)));
    out.push_str(&format!("    dayCount: {},\n", event.day_count));
    out.push_str("    images: {\n");
    for (day, urls) in &event.images {
        if urls.is_empty() {
            out.push_str(&format!("      {day}: [],\n"));
            continue;
        }
        out.push_str(&format!("      {day}: [\n"));
        for url in urls {
            out.push_str(&format!("        {},\n", literal(url)));
        }
        out.push_str("      ],\n");
    }
    out.push_str("    },\n");
    out.push_str("  },\n");
}

/// Quote a string as a JSON (and TypeScript) literal.
fn literal(s: &str) -> String {
    serde_json::Value::from(s).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use crate::types::DaySlot;

    #[test]
    fn one_url_per_line_in_order() {
        let mut event = test_event("ev", 2);
        event.images.insert(
            DaySlot::Day1,
            vec!["https://a.test/1.jpg".into(), "https://a.test/2.jpg".into()],
        );
        let out = render_data_module(&[event]);
        let expected = "      day1: [\n        \"https://a.test/1.jpg\",\n        \"https://a.test/2.jpg\",\n      ],\n      day2: [],\n";
        assert!(out.contains(expected), "{out}");
    }

    #[test]
    fn metadata_is_reproduced_verbatim() {
        let event = test_event("agfi-2026", 3);
        let out = render_data_module(&[event.clone()]);
        assert!(out.contains("    id: \"agfi-2026\",\n"));
        assert!(out.contains(&format!("    name: \"{}\",\n", event.name)));
        assert!(out.contains(&format!("    startDate: \"{}\",\n", event.start_date)));
        assert!(out.contains("    dayCount: 3,\n"));
    }

    #[test]
    fn quotes_and_backslashes_are_escaped() {
        let mut event = test_event("ev", 2);
        event.name = r#"The "Glory" Night \ Part 2"#.to_string();
        event
            .images
            .insert(DaySlot::Day2, vec![r#"https://a.test/x?q="y""#.into()]);
        let out = render_data_module(&[event]);
        assert!(out.contains(r#"name: "The \"Glory\" Night \\ Part 2","#));
        assert!(out.contains(r#""https://a.test/x?q=\"y\"","#));
    }

    #[test]
    fn extra_slots_are_kept() {
        let mut event = test_event("ev", 2);
        event.images.insert(DaySlot::Day4, vec!["late".into()]);
        let out = render_data_module(&[event]);
        assert!(out.contains("      day4: [\n        \"late\",\n      ],\n"));
    }

    #[test]
    fn module_wraps_every_event() {
        let events = vec![test_event("a", 2), test_event("b", 4)];
        let out = render_data_module(&events);
        assert!(out.starts_with("// Generated by crusade-gallery export."));
        assert!(out.contains("export const CRUSADES: CrusadeData[] = [\n  {\n    id: \"a\","));
        assert_eq!(out.matches("    dayCount:").count(), 2);
        assert!(out.contains("export const getAllCrusades"));
        assert!(out.trim_end().ends_with(';'));
    }

    #[test]
    fn exports_live_gallery_state() {
        let mut gallery = open_default();
        gallery
            .add_images(
                SECOND_EVENT,
                DaySlot::Day2,
                ["https://drive.google.com/file/d/NEW1/view"],
            )
            .unwrap();
        let out = render_data_module(&gallery.events_with_images());
        assert!(out.contains("\"https://lh3.googleusercontent.com/d/NEW1\""));
        assert!(out.contains("id: \"agfi-2026-kumasi\""));
    }
}
