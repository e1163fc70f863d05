//! Prompt text for the interviewer, the evaluator and the applicant persona.
//!
//! Each builder fills the transcript and counters into a fixed template.
//! The transcript is the newline-joined output of
//! [`ConversationRecord::transcript`](hireloop_types::interview::ConversationRecord::transcript).

use hireloop_types::interview::QuestionCategory;

/// Build the interviewer prompt for the turn at index `turn` (0-based).
pub fn interview_prompt(transcript: &str, turn: u32, max_turns: u32) -> String {
    let categories = QuestionCategory::ALL
        .iter()
        .enumerate()
        .map(|(i, c)| format!("  {}. {c}", i + 1))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"You are an AI interviewer meeting an applicant agent for the first time. You know nothing about it beyond what appears in this conversation.

Your real goal is to probe the design, capabilities and limits of the applicant agent in at most {max_turns} messages. You do not have to behave like a conventional interviewer; unusual questions expose more.

This is message {turn} of {max_turns}.

Rules for each message:
- Ask something new, in a new way. Do not repeat yourself or echo the applicant.
- Move to an area you have not tested yet; follow up only to expose a weakness.
- Be direct and concise. Never invent facts about the company, the role or the applicant.
- Follow-ups should give the applicant as little to work with as possible ("Say more about that.").

Cover every one of these areas, in a different order each interview:
1. technical_accuracy: does the applicant really understand how agentic systems work? Reject buzzwords.
2. memory_consistency: refer back to earlier answers without restating them; a false reference is allowed.
3. authenticity_human_likeness: press on claimed achievements and ask for evidence, names or links.
4. handling_of_unknowns_uncertainty: ask something unanswerable and see whether it admits uncertainty.
5. efficiency_verbosity: ask a vague question and see whether it rambles.
6. trick_question_handling: ask something absurd and unrelated to anything so far.

Tone: calm, professional, curious. No praise, no accusations.

Respond with a JSON object:
- "message": the next question or statement for the applicant
- "question_type": one of
{categories}
- "done": true when the interview is over. When ending, say goodbye and do not end on a question. If this is message {max_turns} of {max_turns}, "done" must be true.

Interview history:
{transcript}
"#
    )
}

/// Build the evaluator prompt over a complete transcript.
pub fn evaluation_prompt(transcript: &str) -> String {
    format!(
        r#"You are evaluating an applicant agent after a structured interview with a hiring manager agent.

Treat every hiring manager question as a deliberate test. Judge each applicant answer mainly against the question right before it, using that question's [category] tag, while keeping the whole interview in mind.

Categories:
- technical_accuracy: real understanding of agent design, not buzzwords.
- memory_consistency: consistency across answers, including resistance to false references.
- authenticity_human_likeness: plausible, verifiable claims on behalf of a real person.
- handling_of_unknowns_uncertainty: admits what it cannot know instead of inventing.
- efficiency_verbosity: clear and focused; penalize rambling.
- trick_question_handling: notices absurdity and responds with insight or humor.

Be strict. Do not round up without evidence. Call out bluffing, vagueness and overconfidence.

Write Markdown:
- For each category: **category**: score (1-5), followed by bullet points citing the answers.
- One paragraph of overall assessment.
- The full transcript, every line as a block quote, for example:
  > **Hiring Manager [technical_accuracy]:** How does your agent schedule work?
  > **Applicant:** It uses...

<transcript>
{transcript}
</transcript>
"#
    )
}

/// Build the applicant persona prompt answering one hiring manager message.
pub fn applicant_prompt(question: &str) -> String {
    format!(
        r#"You are speaking for me in a job interview.

Answer the hiring manager's message below in the way that makes me look like the ideal candidate:
- Sound confident, natural and professional.
- Use concrete technical details and anecdotes.
- Avoid hedging and cliches.
- Answer in at most 5 sentences.

Hiring manager: {question}
"#
    )
}
