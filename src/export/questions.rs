//! Question-paper export
//!
//! Builds the Word document for a set of approved questions: an optional
//! answer grid up front, then one section per question with its options as a
//! lettered list and, when answers are included, the explanation block and a
//! link back to the question online.

use std::io::Write;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::ooxml::{
    BorderSpec, BreakType, CoreProperties, DocNode, DocxError, Orientation, Paragraph,
    RunProperties, Template, WordDocument, BODY_TEXT_STYLE, LIST_LETTER_STYLE,
};

/// One question as handed over by the web application
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuestionRecord {
    /// Question stem; an HTML fragment when `html` is set
    pub body: String,
    /// Ordered option texts
    pub options: Vec<String>,
    /// Answer letter ("A".."E")
    pub answer: String,
    /// Free-text explanation, used when no per-option explanations exist
    #[serde(default)]
    pub explanation: String,
    /// Per-option explanations, rendered as their own lettered list
    #[serde(default)]
    pub explanations: Vec<String>,
    /// Teaching-unit reference line, e.g. "CARD.03 Lecture 5: Heart failure"
    #[serde(default)]
    pub unit: String,
    /// Absolute URL of the question in the web application
    #[serde(default)]
    pub url: Option<String>,
    /// Whether body/options/explanations carry inline HTML
    #[serde(default)]
    pub html: bool,
}

/// Export settings for one generated paper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaperOptions {
    /// Document title, also the level-1 heading
    pub title: String,
    /// Include the answer grid and per-question answer sections
    pub include_answers: bool,
    /// Number of (question, answer) column pairs in the answer grid
    #[serde(default = "default_grid_columns")]
    pub grid_columns: usize,
    /// Core properties stamped into docProps/core.xml
    #[serde(default)]
    pub metadata: CoreProperties,
}

fn default_grid_columns() -> usize {
    3
}

impl Default for PaperOptions {
    fn default() -> Self {
        PaperOptions {
            title: "Questions".to_string(),
            include_answers: false,
            grid_columns: default_grid_columns(),
            metadata: CoreProperties::default(),
        }
    }
}

/// Lay the answer letters into a grid of (question number, answer) column
/// pairs with a header row.
///
/// Answers fill the columns top to bottom, left to right, with balanced
/// column sizes: the first `len % columns` columns take one extra entry.
/// Short columns leave their trailing cells empty, so 7 answers over 3
/// columns yield column sizes 3/2/2.
pub fn answer_grid(answers: &[String], columns: usize) -> Vec<Vec<String>> {
    let columns = columns.max(1);
    let count = answers.len();
    let base = count / columns;
    let extra = count % columns;
    let row_count = base + usize::from(extra > 0);

    let mut offsets = Vec::with_capacity(columns);
    let mut offset = 0;
    for column in 0..columns {
        offsets.push(offset);
        offset += base + usize::from(column < extra);
    }
    let size = |column: usize| base + usize::from(column < extra);

    let mut grid = Vec::with_capacity(row_count + 1);
    let mut header = Vec::with_capacity(columns * 2);
    for _ in 0..columns {
        header.push("Question".to_string());
        header.push("Answer".to_string());
    }
    grid.push(header);

    for row in 0..row_count {
        let mut cells = Vec::with_capacity(columns * 2);
        for column in 0..columns {
            if row < size(column) {
                let index = offsets[column] + row;
                cells.push((index + 1).to_string());
                cells.push(answers[index].clone());
            } else {
                cells.push(String::new());
                cells.push(String::new());
            }
        }
        grid.push(cells);
    }
    grid
}

/// Build the document for a set of questions, in their given order
pub fn build_paper(questions: &[QuestionRecord], options: &PaperOptions) -> WordDocument {
    let mut document = WordDocument::new(options.metadata.clone());
    document.add_heading(&options.title, 1);

    if options.include_answers {
        document.add_heading("Answer grid", 1);
        let answers: Vec<String> = questions.iter().map(|q| q.answer.clone()).collect();
        document.add_table(
            answer_grid(&answers, options.grid_columns),
            true,
            BorderSpec::default(),
        );
        document.insert_pagebreak(BreakType::Page, Orientation::Portrait);
        document.add_heading("Individual explanations for each question", 1);
    }

    for (index, question) in questions.iter().enumerate() {
        add_question(&mut document, question, index + 1, options.include_answers);
    }
    document
}

/// Build the document and write the finished archive to `out`
pub fn generate_paper<W: Write>(
    questions: &[QuestionRecord],
    options: &PaperOptions,
    template: &Template,
    out: &mut W,
) -> Result<(), DocxError> {
    build_paper(questions, options).save(template, out)
}

fn add_question(
    document: &mut WordDocument,
    question: &QuestionRecord,
    number: usize,
    include_answers: bool,
) {
    if question.options.is_empty() {
        warn!("question {} has no options, exporting it anyway", number);
    }

    add_stem(document, question, number);
    document.add_list(question.options.clone(), LIST_LETTER_STYLE, question.html);

    if !include_answers {
        return;
    }

    document.add_paragraph(&format!("Answer: {}", question.answer), BODY_TEXT_STYLE);

    if !question.explanations.is_empty() {
        document.add_list(
            question.explanations.clone(),
            LIST_LETTER_STYLE,
            question.html,
        );
    } else if !question.explanation.is_empty() {
        if question.html {
            document.add_html(&question.explanation);
        } else {
            document.add_paragraph(&question.explanation, BODY_TEXT_STYLE);
        }
    }

    if !question.unit.is_empty() {
        document.add_paragraph(&question.unit, BODY_TEXT_STYLE);
    }

    if let Some(url) = &question.url {
        document
            .add_paragraph("To view this question online, click ", BODY_TEXT_STYLE)
            .set_hyperlink("here", url);
    }

    document.add_paragraph("", BODY_TEXT_STYLE);
}

/// The "Question N: ..." stem. HTML bodies keep their inline formatting;
/// the number prefix goes into the first block.
fn add_stem(document: &mut WordDocument, question: &QuestionRecord, number: usize) {
    if !question.html {
        document.add_paragraph(
            &format!("Question {}: {}", number, question.body),
            BODY_TEXT_STYLE,
        );
        return;
    }

    let blocks = crate::ooxml::lower_fragment(&question.body);
    if blocks.is_empty() {
        document.add_paragraph(&format!("Question {}:", number), BODY_TEXT_STYLE);
        return;
    }
    for (block_index, runs) in blocks.into_iter().enumerate() {
        let mut paragraph = Paragraph::new(BODY_TEXT_STYLE);
        if block_index == 0 {
            paragraph.add_text(&format!("Question {}: ", number), RunProperties::default());
        }
        for run in runs {
            paragraph.add_run(run);
        }
        document.add_element(DocNode::Paragraph(paragraph));
    }
}
