// All LLM prompt constants for the Feedback module.

/// Feedback prompt template.
/// Replace: {level}, {requirements}, {prompt}, {student_writing}, {categories}, {word_count}
///
/// Placeholders are filled in a single pass; user text is never re-scanned.
pub const FEEDBACK_PROMPT_TEMPLATE: &str = r#"You are an expert English writing coach. Analyze the following student's writing based on their stated requirements and prompt. Your feedback must be constructive, insightful, and tailored to the student's English level: {level}.

**1. Writing Requirements:** {requirements}
**2. Writing Prompt:** {prompt}
**3. Student's Writing:**
---
{student_writing}
---

Your task is to provide feedback in a structured JSON format. The feedback must include a detailed analysis for each of these 6 categories: {categories}.

**CRITICAL RULES - READ CAREFULLY:**
1. **NO FALSE POSITIVES (Crucial):** Before creating a suggestion, CHECK if the student *already* did it correctly.
   - Example: If the student wrote "First, students..." (with a comma), DO NOT generate a suggestion telling them to add a comma.
   - Only generate a suggestion if there is an ACTUAL error or a Clear improvement needed.
2. **Exact 'Original' Text:** The 'original' field MUST be an exact copy-paste from the student's writing. Do NOT fix typos, capitalization, or punctuation in the 'original' field.
3. **Localization:** All 'strengths', 'weaknesses' and 'explanation' fields MUST be in Vietnamese.
4. **Rule Summary:** Provide a 'rule_summary' (Short A2 English command) AND a 'rule_meaning_vn' (Vietnamese translation).
5. **Word Count:** The student's writing has exactly {word_count} words. Strictly assess if this meets the requirement. Do NOT recount.
6. **Collocations:** "original" = idiom; "changed" = example; "explanation" = meaning (VN); "rule_summary" = essence (EN); "rule_meaning_vn" = essence (VN).
"#;

/// Appended for levels that get the advanced-enrichment tables.
pub const ENRICHMENT_INSTRUCTION: &str = "\
7. **Advanced Enrichment:** Provide advanced grammar and vocabulary in the 'advancedEnrichment' field.
";
