//! Built-in question catalog.
//!
//! Static, read-only. Serves as style exemplars for generated questions and as
//! the fallback source when generation fails.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use crate::interview::models::{Difficulty, Question, QuestionType};

static CATALOG: OnceLock<Vec<Question>> = OnceLock::new();

/// The full catalog in declaration order.
pub fn catalog() -> &'static [Question] {
    CATALOG.get_or_init(build_catalog)
}

/// Questions at `difficulty`, in catalog order. Empty if none match.
pub fn questions_by_difficulty(difficulty: Difficulty) -> Vec<&'static Question> {
    catalog()
        .iter()
        .filter(|q| q.difficulty == difficulty)
        .collect()
}

pub fn question_by_id(id: &str) -> Option<&'static Question> {
    catalog().iter().find(|q| q.id == id)
}

fn criteria(technical: &str, efficiency: &str, practices: &str, communication: &str) -> BTreeMap<String, String> {
    [
        ("technical", technical),
        ("efficiency", efficiency),
        ("practices", practices),
        ("communication", communication),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

fn question(
    id: &str,
    question_type: QuestionType,
    difficulty: Difficulty,
    text: &str,
    expected_answer: &str,
    scoring_criteria: BTreeMap<String, String>,
) -> Question {
    Question {
        id: id.to_string(),
        question_type,
        difficulty,
        question: text.to_string(),
        expected_answer: expected_answer.to_string(),
        scoring_criteria,
    }
}

fn build_catalog() -> Vec<Question> {
    vec![
        // Warmup
        question(
            "w1",
            QuestionType::Formula,
            Difficulty::Beginner,
            "How would you calculate the sum of values in cells A1 through A10?",
            "=SUM(A1:A10)",
            criteria(
                "Correct SUM function usage",
                "Direct range reference",
                "Proper cell referencing",
                "Clear explanation",
            ),
        ),
        question(
            "w2",
            QuestionType::Formula,
            Difficulty::Beginner,
            "What's the difference between relative and absolute cell references? Give an example.",
            "Relative (A1) changes when copied, absolute ($A$1) stays fixed. Mixed references like $A1 or A$1 fix only row or column.",
            criteria(
                "Understands reference types",
                "Knows when to use each",
                "Proper $ usage",
                "Clear examples",
            ),
        ),
        question(
            "w3",
            QuestionType::Formula,
            Difficulty::Beginner,
            "How would you count the number of non-empty cells in a range?",
            "Use COUNTA function: =COUNTA(A1:A10)",
            criteria(
                "Correct function usage",
                "Direct approach",
                "Proper syntax",
                "Clear explanation",
            ),
        ),
        // Core assessment
        question(
            "c1",
            QuestionType::DataAnalysis,
            Difficulty::Intermediate,
            "You have sales data with columns: Date, Product, Region, Sales Amount. How would you find the top 3 products by total sales?",
            "Use SUMIF or Pivot Table to sum sales by product, then sort descending or use LARGE function with INDEX/MATCH.",
            criteria(
                "Correct aggregation method",
                "Optimal approach selection",
                "Considers data structure",
                "Step-by-step explanation",
            ),
        ),
        question(
            "c2",
            QuestionType::PivotTable,
            Difficulty::Intermediate,
            "Describe how you'd create a pivot table to analyze monthly sales trends by region.",
            "Insert > Pivot Table, drag Date to Rows (group by month), Region to Columns, Sales to Values (sum), format appropriately.",
            criteria(
                "Correct pivot table setup",
                "Proper field placement",
                "Data grouping knowledge",
                "Clear process description",
            ),
        ),
        question(
            "c3",
            QuestionType::Formula,
            Difficulty::Intermediate,
            "How would you use VLOOKUP to find a product price from a price list?",
            "=VLOOKUP(product_name, price_table, price_column_number, FALSE) for exact match.",
            criteria(
                "Correct VLOOKUP syntax",
                "Proper match type",
                "Table reference method",
                "Clear parameter explanation",
            ),
        ),
        // Advanced challenge
        question(
            "a1",
            QuestionType::Formula,
            Difficulty::Advanced,
            "How would you create a dynamic lookup that returns the second highest value for each category in your data?",
            "Use LARGE function with criteria: =LARGE(IF(Category=A2,Values),2) as array formula, or MAXIFS with helper columns.",
            criteria(
                "Advanced function knowledge",
                "Handles dynamic criteria",
                "Array formula understanding",
                "Explains complexity",
            ),
        ),
        question(
            "a2",
            QuestionType::BestPractices,
            Difficulty::Advanced,
            "What are the key principles for building maintainable Excel models for financial analysis?",
            "Separate inputs/calculations/outputs, use named ranges, consistent formatting, documentation, error checking, version control.",
            criteria(
                "Model structure knowledge",
                "Scalability considerations",
                "Professional standards",
                "Comprehensive coverage",
            ),
        ),
    ]
}
