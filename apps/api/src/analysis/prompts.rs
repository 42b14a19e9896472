// Prompt text for résumé-vs-JD analysis.
//
// The reply shape requested here is what `interpreter` reads back:
// {"JD Match":"%","MissingKeywords":[],"Profile Summary":""}
// Inputs are embedded verbatim. Quotes and braces inside them are not escaped.

/// Fixed ATS instruction placed ahead of the résumé and job description.
pub const ATS_INSTRUCTION: &str = "\
Hey Act Like a skilled or very experienced ATS (Application Tracking System) \
with a deep understanding of tech field, software engineering, data science, data analyst, \
and big data engineer. Your task is to evaluate the resume based on the given job description. \
You must consider the job market is very competitive and you should provide \
best assistance for improving the resumes. Assign the percentage matching based \
on JD and the missing keywords with high accuracy.";

/// Reply-shape instruction placed after the inputs.
pub const RESPONSE_SHAPE_INSTRUCTION: &str = r#"I want the response in one single string having the structure
{"JD Match":"%","MissingKeywords":[],"Profile Summary":""}"#;

/// Builds the analysis prompt. Pure and deterministic.
///
/// Both inputs are interpolated in one pass, so text in the résumé that looks
/// like a placeholder is never substituted with the job description.
pub fn build_prompt(resume_text: &str, job_description: &str) -> String {
    format!(
        "{ATS_INSTRUCTION}\n\nresume: {resume_text}\ndescription: {job_description}\n\n{RESPONSE_SHAPE_INSTRUCTION}\n"
    )
}
