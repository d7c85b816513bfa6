use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    #[serde(default)]
    pub id: String,
    #[serde(flatten)]
    pub body: RequestBody,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RequestBody {
    GetSuggestions {
        word: String,
        #[serde(default)]
        languages: Vec<String>,
    },
    GetAllWords {
        #[serde(default)]
        languages: Vec<String>,
    },
    GetCustomWordsOnly {
        word: String,
    },
    HistoryIncrement {
        word: String,
    },
    HistoryRemove {
        word: String,
    },
    AddToIgnoreList {
        word: String,
    },
    ReloadConfigs,
    ProcessSuggestion {
        text: String,
    },
    Ping,
}

impl RequestBody {
    pub fn operation(&self) -> &'static str {
        match self {
            RequestBody::GetSuggestions { .. } => "get_suggestions",
            RequestBody::GetAllWords { .. } => "get_all_words",
            RequestBody::GetCustomWordsOnly { .. } => "get_custom_words_only",
            RequestBody::HistoryIncrement { .. } => "history_increment",
            RequestBody::HistoryRemove { .. } => "history_remove",
            RequestBody::AddToIgnoreList { .. } => "add_to_ignore_list",
            RequestBody::ReloadConfigs => "reload_configs",
            RequestBody::ProcessSuggestion { .. } => "process_suggestion",
            RequestBody::Ping => "ping",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    #[serde(default)]
    pub id: String,
    #[serde(flatten)]
    pub body: ResponseBody,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResponseBody {
    Suggestions { words: Vec<String> },
    Processed { text: String },
    Ok,
    Pong,
    Error(ErrorResponse),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: ErrorCode,
    pub message: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    InvalidRequest,
    Internal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_get_suggestions_request() {
        let raw = r#"{"id":"abc","type":"get_suggestions","word":"ap","languages":["English"]}"#;
        let request: Request = serde_json::from_str(raw).unwrap();
        assert_eq!(request.id, "abc");
        match request.body {
            RequestBody::GetSuggestions { word, languages } => {
                assert_eq!(word, "ap");
                assert_eq!(languages, vec!["English".to_owned()]);
            }
            _ => panic!("expected get_suggestions request"),
        }
    }

    #[test]
    fn languages_default_to_empty() {
        let raw = r#"{"type":"get_all_words"}"#;
        let request: Request = serde_json::from_str(raw).unwrap();
        match request.body {
            RequestBody::GetAllWords { languages } => assert!(languages.is_empty()),
            _ => panic!("expected get_all_words request"),
        }
    }

    #[test]
    fn serialize_suggestions_response() {
        let response = Response {
            id: "1".to_owned(),
            body: ResponseBody::Suggestions {
                words: vec!["apt".to_owned()],
            },
        };
        let raw = serde_json::to_string(&response).unwrap();
        assert!(raw.contains(r#""type":"suggestions""#));
        assert!(raw.contains(r#""words":["apt"]"#));
    }
}
