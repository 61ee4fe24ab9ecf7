// All LLM prompt templates for the five generation stages.
// Placeholders in `{braces}` are filled by generator.rs before sending.
// Shared fragments live in llm_client::prompts.

/// Summary stage.
/// Replace: {sentences}, {language}, {resume_data}, {job_description}, {grounding}, {json_only}
pub const SUMMARY_PROMPT_TEMPLATE: &str = r#"Based on this resume data and job description, generate a professional summary in
{sentences} sentences in {language} that highlights key achievements and skills.

Resume Data:
{resume_data}

Job Description:
{job_description}

Focus on:
1. Relevant technical skills and experience
2. Quantifiable achievements
3. Alignment with job requirements

{grounding}

Format the response as JSON with this structure:
{"summary": "your generated summary"}

{json_only}"#;

/// Skills stage.
/// Replace: {tools}, {job_description}, {grounding}, {json_only}
pub const SKILLS_PROMPT_TEMPLATE: &str = r#"Based on this resume data and job description, select the most relevant tools, frameworks, and technologies.

Resume Data:
Tools & Frameworks: {tools}

Job Description:
{job_description}

Create a curated list of relevant tools and technologies. Format as JSON with this structure:
{
  "relevant_tools": ["tool1", "tool2", "tool3"],
  "summary_text": "Experienced with AWS, Docker, and Kubernetes for cloud deployment. Proficient in CI/CD with Github Actions and security practices including OAuth 2.0 and JWT.",
  "comma_separated_text": "AWS, Docker, Kubernetes, Github Actions, OAuth 2.0, JWT, FastAPI, PostgreSQL"
}

Focus on:
1. Tools and technologies specifically mentioned in the job description
2. Related or complementary tools from the resume
3. For summary_text: natural-sounding sentences grouped by capability
4. For comma_separated_text: the most important tools separated by commas
5. Both renderings must cover the key technical capabilities

{grounding}

{json_only}"#;

/// Experience stage.
/// Replace: {max_bullets}, {max_words}, {language}, {experience}, {job_description}, {grounding}, {json_only}
pub const EXPERIENCE_PROMPT_TEMPLATE: &str = r#"Based on this resume data and job description, select and format the top {max_bullets} most relevant experiences in {language}.

Resume Data:
{experience}

Job Description:
{job_description}

For each experience:
1. Keep the structured data (what / how / impact / tech_stack)
2. Add a formatted_text field combining them into one professional bullet point of no more than {max_words} words
3. The formatted text must:
   - Use strong action verbs
   - Emphasize quantifiable achievements
   - Highlight relevant technical skills
   - Focus on impact and results
4. Order the list by relevance to the job description, most relevant first
5. Return AT MOST {max_bullets} experiences

Format as a JSON list. Example element:
{
  "what": "Developed backend system",
  "how": "Implemented microservices architecture",
  "impact": "Reduced latency by 50%",
  "tech_stack": ["FastAPI", "Docker"],
  "formatted_text": "Engineered a microservices backend with FastAPI and Docker, reducing latency by 50%"
}

{grounding}

{json_only}"#;

/// Projects stage.
/// Replace: {max_projects}, {max_words}, {language}, {projects}, {job_description}, {grounding}, {json_only}
pub const PROJECTS_PROMPT_TEMPLATE: &str = r#"Based on this resume data and job description, select and format the {max_projects} most relevant projects in {language}.

Resume Data:
{projects}

Job Description:
{job_description}

For each project:
1. Select the most relevant details for the job description
2. Write EXACTLY two formatted bullet points that:
   - Use strong action verbs
   - Emphasize technical achievements
   - Highlight relevant technologies
   - Keep each bullet under {max_words} words
3. Order the projects by relevance to the job description, most relevant first

Format as JSON with this structure:
{
  "projects": [
    {
      "name": "Project Name",
      "url": "project url",
      "date": "date range",
      "tech_stack": ["tech1", "tech2"],
      "formatted_bullets": ["First formatted bullet point", "Second formatted bullet point"]
    }
  ]
}

{grounding}

{json_only}"#;

/// Coursework stage.
/// Replace: {max_courses}, {language}, {coursework}, {job_description}, {prefix}, {translation_rules}, {json_only}
pub const COURSEWORK_PROMPT_TEMPLATE: &str = r#"Based on this resume data and job description, select the top {max_courses} most relevant coursework in {language}.

Resume Data:
Coursework: {coursework}

Job Description:
{job_description}

Select coursework that:
1. Directly relates to the job requirements
2. Demonstrates relevant technical knowledge
3. Complements the professional experience

Format as JSON with this structure:
{
  "selected_coursework": ["Course 1", "Course 2", "Course 3"],
  "comma_separated_text": "{prefix} Course 1, Course 2, Course 3"
}

Important:
1. Return AT MOST {max_courses} courses
2. The comma_separated_text MUST start with "{prefix}"
{translation_rules}

{json_only}"#;

/// Coursework rules for English output.
pub const ENGLISH_COURSEWORK_RULES: &str =
    "3. Keep the course names exactly as written in the resume data";

/// Coursework rules for Korean output.
pub const KOREAN_COURSEWORK_RULES: &str = r#"3. Translate every course name to Korean
4. Follow each translated name with the original English name in parentheses, e.g. "데이터베이스 시스템 (Database Systems)"
5. Use the same "translated (English)" form inside comma_separated_text
6. Keep the meaning and technical accuracy of each course name"#;
