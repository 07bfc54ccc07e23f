// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Minimal article document writer.
//!
//! Hosts with a full schema mapping plug in their own [`DocumentSerializer`];
//! this one records just enough to identify the article inside a batch.

use std::fmt::Write as _;

use super::DocumentSerializer;
use crate::models::{Article, Issue, JournalContext};

#[derive(Clone, Copy, Debug, Default)]
pub struct XmlArticleSerializer;

impl DocumentSerializer for XmlArticleSerializer {
    fn serialize(&self, context: &JournalContext, issue: &Issue, article: &Article) -> Vec<u8> {
        let mut doc = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        let _ = writeln!(doc, "<article id=\"{}\">", escape(&article.id));
        let _ = writeln!(doc, "  <journal acronym=\"{}\">", escape(&context.acronym));
        if let Some(issn) = context.display_issn() {
            let _ = writeln!(doc, "    <issn>{}</issn>", escape(issn));
        }
        doc.push_str("  </journal>\n");
        let _ = writeln!(
            doc,
            "  <issue id=\"{}\">{}</issue>",
            escape(&issue.id),
            escape(&issue.title)
        );
        let _ = writeln!(doc, "  <title>{}</title>", escape(&article.title));
        let _ = writeln!(doc, "  <sequence>{}</sequence>", article.seq);
        doc.push_str("  <galleys>\n");
        for galley in &article.galleys {
            let file = galley
                .file
                .as_ref()
                .map(|f| f.client_file_name.as_str())
                .unwrap_or_default();
            let _ = writeln!(
                doc,
                "    <galley id=\"{}\" label=\"{}\" file=\"{}\"/>",
                escape(&galley.id),
                escape(&galley.label),
                escape(file)
            );
        }
        doc.push_str("  </galleys>\n</article>\n");
        doc.into_bytes()
    }
}

fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{XmlArticleSerializer, escape};
    use crate::models::{Article, Galley, Issue, JournalContext, PublicationStatus};
    use crate::store::DocumentSerializer;

    #[test]
    fn escape_replaces_markup_characters() {
        assert_eq!(escape(r#"a<b & "c">"#), "a&lt;b &amp; &quot;c&quot;&gt;");
    }

    #[test]
    fn serialize_embeds_identifiers_and_galleys() {
        let context = JournalContext {
            id: "j1".into(),
            acronym: "JDS".into(),
            print_issn: Some("1234-5678".into()),
            ..Default::default()
        };
        let issue = Issue {
            id: "I1".into(),
            context_id: "j1".into(),
            title: "Vol. 1".into(),
            articles: Vec::new(),
        };
        let article = Article {
            id: "A1".into(),
            seq: 1,
            status: PublicationStatus::Published,
            title: "Fish & Chips".into(),
            galleys: vec![Galley {
                id: "G1".into(),
                label: "PDF".into(),
                file: None,
            }],
        };

        let xml = String::from_utf8(XmlArticleSerializer.serialize(&context, &issue, &article)).unwrap();

        assert!(xml.starts_with("<?xml"));
        assert!(xml.contains("<article id=\"A1\">"));
        assert!(xml.contains("<issn>1234-5678</issn>"));
        assert!(xml.contains("<title>Fish &amp; Chips</title>"));
        assert!(xml.contains("<galley id=\"G1\" label=\"PDF\" file=\"\"/>"));
    }
}
