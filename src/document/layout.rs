use chrono::NaiveDateTime;

use crate::translate::TranslationResult;

pub const REPORT_TITLE: &str = "智能翻译报告";
pub const METADATA_HEADING: &str = "基本信息";
pub const GENERATED_AT_LABEL: &str = "生成时间";
pub const DOCUMENT_ID_LABEL: &str = "文档ID";
pub const CHAR_COUNT_LABEL: &str = "字符数";
pub const ORIGINAL_HEADING: &str = "原文内容";
pub const TRANSLATION_HEADING: &str = "翻译结果";
pub const GLOSSARY_HEADING: &str = "专业词汇表";
pub const GLOSSARY_COLUMNS: [&str; 3] = ["英文术语", "中文翻译", "解释说明"];

/// One block of the report, in document order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// Centered report title
    Title(String),
    Heading(String),
    Paragraph(String),
    /// `header` marks the first row as a repeated, bold header row
    Table { rows: Vec<Vec<String>>, header: bool },
}

/// Format-independent model of a translation report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportLayout {
    pub blocks: Vec<Block>,
}

#[cfg(test)]
impl ReportLayout {
    pub fn headings(&self) -> Vec<&str> {
        self.blocks
            .iter()
            .filter_map(|b| match b {
                Block::Heading(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn has_glossary(&self) -> bool {
        self.headings().contains(&GLOSSARY_HEADING)
    }

    /// Header plus one row per glossary entry, if the section exists
    pub fn glossary_rows(&self) -> Option<&[Vec<String>]> {
        let pos = self
            .blocks
            .iter()
            .position(|b| matches!(b, Block::Heading(h) if h == GLOSSARY_HEADING))?;
        match self.blocks.get(pos + 1) {
            Some(Block::Table { rows, .. }) => Some(rows.as_slice()),
            _ => None,
        }
    }
}

/// Lay out the report sections in their fixed order.
///
/// `generated_at` and `document_id` are captured once by the caller so the
/// same values appear everywhere they are used.
pub fn build_layout(
    original_text: &str,
    result: &TranslationResult,
    include_vocabulary: bool,
    generated_at: &NaiveDateTime,
    document_id: &str,
) -> ReportLayout {
    let mut blocks = vec![
        Block::Title(REPORT_TITLE.to_string()),
        Block::Heading(METADATA_HEADING.to_string()),
        Block::Table {
            rows: vec![
                vec![
                    GENERATED_AT_LABEL.to_string(),
                    generated_at.format("%Y-%m-%d %H:%M:%S").to_string(),
                ],
                vec![DOCUMENT_ID_LABEL.to_string(), document_id.to_string()],
                vec![
                    CHAR_COUNT_LABEL.to_string(),
                    original_text.chars().count().to_string(),
                ],
            ],
            header: false,
        },
        Block::Heading(ORIGINAL_HEADING.to_string()),
        Block::Paragraph(original_text.to_string()),
        Block::Heading(TRANSLATION_HEADING.to_string()),
        Block::Paragraph(result.translation.clone()),
    ];

    if include_vocabulary {
        let mut rows: Vec<Vec<String>> = vec![GLOSSARY_COLUMNS.iter().map(|c| c.to_string()).collect()];
        rows.extend(result.vocabulary.iter().map(|entry| {
            vec![
                entry.term.clone(),
                entry.translated_term.clone(),
                entry.explanation.clone(),
            ]
        }));
        blocks.push(Block::Heading(GLOSSARY_HEADING.to_string()));
        blocks.push(Block::Table { rows, header: true });
    }

    ReportLayout { blocks }
}
