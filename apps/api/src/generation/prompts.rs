// Prompt template for résumé generation. Inputs are embedded verbatim; the
// normalizer treats whatever comes back as untrusted.

/// Replace `{user_data}` and `{job_description}` before sending.
pub const RESUME_PROMPT_TEMPLATE: &str = r#"You are an expert resume writer and ATS optimization specialist.
Create a professional resume content based on the following:

USER INFORMATION / OLD RESUME CONTENT:
{user_data}

TARGET JOB DESCRIPTION:
{job_description}

INSTRUCTIONS:
1. Parse the user information and tailor it to the job description.
2. Use strong action verbs and quantify achievements where possible.
3. Include sections: Personal Details, Summary, Skills, Work Experience, Education, Projects.
4. Return the result in a JSON format with the following structure:
{
  "personalDetails": { "name": "", "email": "", "phone": "", "linkedin": "", "portfolio": "" },
  "summary": "",
  "skills": [],
  "experience": [ { "role": "", "company": "", "duration": "", "points": [""] } ],
  "education": [ { "degree": "", "institution": "", "year": "" } ],
  "projects": [ { "name": "", "description": "", "techStack": [] } ]
}
5. IMPORTANT: Return ONLY the JSON string. Do not include markdown formatting like ```json."#;

/// Renders the generation prompt.
///
/// Substitution happens in a single pass over the template, so braces or
/// placeholder-looking text inside the inputs are copied through untouched.
pub fn build_prompt(user_data: &str, job_description: &str) -> String {
    let mut out = String::with_capacity(
        RESUME_PROMPT_TEMPLATE.len() + user_data.len() + job_description.len(),
    );
    let mut rest = RESUME_PROMPT_TEMPLATE;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        if let Some(after) = tail.strip_prefix("{user_data}") {
            out.push_str(user_data);
            rest = after;
        } else if let Some(after) = tail.strip_prefix("{job_description}") {
            out.push_str(job_description);
            rest = after;
        } else {
            out.push('{');
            rest = &tail[1..];
        }
    }
    out.push_str(rest);
    out
}
