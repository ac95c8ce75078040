use crate::openai::{ChatCompletionRequest, Message};

pub const DEFAULT_ANALYSIS_MODEL: &str = "glm-4-flash";
pub const ANALYSIS_TEMPERATURE: f32 = 0.7;
pub const ANALYSIS_MAX_TOKENS: u32 = 2000;

pub const ANALYST_SYSTEM_PROMPT: &str =
    "你是一个专业的图书分析专家。请严格按照JSON格式返回信息，不要包含任何其他文字。";

/// User instruction asking for the analysis of `title` in the fixed JSON shape.
pub fn analysis_prompt(title: &str) -> String {
    format!(
        r#"分析《{title}》这本书，返回格式如下：
{{
  "title": "书名",
  "author": "作者",
  "published_year": 出版年份数字,
  "summary": "300字以内的内容简介",
  "main_content": "1000字以内的主要内容梳理",
  "insights": "500字以内的心得体会",
  "quotes": ["金句1", "金句2", "金句3"]
}}"#
    )
}

pub fn analysis_request(model: &str, title: &str) -> ChatCompletionRequest {
    ChatCompletionRequest {
        model: model.to_string(),
        messages: vec![
            Message::system(ANALYST_SYSTEM_PROMPT),
            Message::user(analysis_prompt(title)),
        ],
        temperature: Some(ANALYSIS_TEMPERATURE),
        max_tokens: Some(ANALYSIS_MAX_TOKENS),
    }
}
