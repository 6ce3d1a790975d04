// All LLM prompt constants for the generation pipeline.
// Templates use `{name}` placeholders filled with `str::replace` before sending.

/// Resume extraction prompt template. Replace `{resume_text}` before sending.
/// The schema block below is the contract the structured extractor decodes
/// against; the reply is still treated as untrusted free text.
pub const RESUME_EXTRACT_PROMPT_TEMPLATE: &str = r#"Extract the following information from this resume text:

1. Personal Information:
   - Full Name
   - Email
   - Phone Number
   - Location/City
   - LinkedIn URL (if available)

2. Professional Information:
   - Current/Last Job Title
   - Years of Experience
   - Education (Degree, Institution, Year)
   - Certifications (if any)

3. Professional Summary (2-3 sentences)

4. Work Experience (most recent first)

5. Technical Skills:
   - Programming Languages
   - Frameworks & Libraries
   - Tools & Technologies
   - Databases
   - Cloud Platforms

6. Soft Skills

Resume Text:
{resume_text}

Format your response as a JSON object with the following structure:
{
  "personalInfo": {
    "fullName": "string",
    "email": "string",
    "phone": "string",
    "location": "string",
    "linkedin": "string"
  },
  "professionalInfo": {
    "currentTitle": "string",
    "yearsOfExperience": "string",
    "education": "string",
    "certifications": ["string"]
  },
  "professionalSummary": "string",
  "workExperience": [
    {"title": "string", "company": "string", "years": "string", "description": "string"}
  ],
  "technicalSkills": ["string"],
  "softSkills": ["string"]
}"#;

/// Question generation prompt template.
/// Replace: {question_count}, {role}, {skills}, {complexity_band},
///          {complexity_score}, {resume_excerpt}
pub const GENERATION_PROMPT_TEMPLATE: &str = r#"You are an expert technical interviewer. Generate {question_count} interview questions for a {role} position.

Requirements:
- Role: {role}
- Required Skills: {skills}
- Question Complexity: {complexity_band} ({complexity_score}/100)
- Number of Questions: {question_count}

Context from resume: {resume_excerpt}

Generate questions that:
1. Are appropriate for the specified role and skills
2. Match the complexity level ({complexity_band})
3. Include a mix of technical, behavioral, and problem-solving questions
4. Are clear, specific, and actionable
5. Include expected answers or key points to evaluate

Format your response as a JSON array with the following structure:
[
  {
    "question": "The actual question text",
    "type": "technical|behavioral|problem-solving",
    "complexity": "beginner|intermediate|advanced",
    "expectedAnswer": "Key points or expected answer",
    "skills": ["skill1", "skill2"]
  }
]

Generate exactly {question_count} questions."#;

/// Directive appended when the caller supplies custom instructions.
/// Replace `{custom_instructions}` before sending.
///
/// This gate is advisory: relevance judgment and enforcement are delegated
/// entirely to the model. The pipeline recognizes the refusal object in the
/// reply but performs no relevance check of its own.
pub const INSTRUCTION_GATE_TEMPLATE: &str = r#"

CUSTOM INSTRUCTIONS FROM THE INTERVIEWER:
{custom_instructions}

Evaluate these custom instructions against the stated role and required skills before generating:
- If they are generic interviewing guidance or compatible with the role and skills, follow them silently and generate the questions as specified above.
- If they are unrelated to the role and skills, contradict the requirements above, or are inappropriate, do NOT generate any questions. Respond instead with a single JSON object in place of the array:
{"error": "Brief description of the problem", "reason": "Why the instructions were rejected"}"#;
