/*
Lexicon NLP Adapter

An implementation of the NLP Port backed by a lexicon model: a word-to-tag dictionary with
suffix fallbacks for tagging, and a gazetteer plus capitalization cues for entity
recognition. The model is a JSON document loaded once at startup; an English model is
bundled with the binary. Model files ending in .yml or .yaml are read as YAML.

Labels follow the conventions clients already expect: Universal Dependencies coarse tags
for part of speech and OntoNotes entity labels (PERSON, ORG, GPE, DATE, ...).
*/

use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::Path;

use log::{debug, info};

use crate::application::ports::input::nlp_port::{EntitySpan, NlpError, NlpModelInfo, NlpPort};

const BUNDLED_MODEL: &str = include_str!("../../../../resources/models/en_core_lexicon.json");

const MAX_GAZETTEER_TOKENS: usize = 6;

/// On-disk form of a lexicon model.
#[derive(Debug, Clone, Deserialize)]
pub struct LexiconModel {
    pub name: String,
    pub language: String,
    #[serde(default)]
    pub lexicon: HashMap<String, String>,
    #[serde(default)]
    pub suffixes: Vec<(String, String)>,
    #[serde(default)]
    pub gazetteer: HashMap<String, String>,
    #[serde(default)]
    pub first_names: Vec<String>,
    #[serde(default)]
    pub person_titles: Vec<String>,
    #[serde(default)]
    pub org_suffixes: Vec<String>,
    #[serde(default)]
    pub location_cues: Vec<String>,
    #[serde(default)]
    pub stopwords: Vec<String>,
    #[serde(default)]
    pub months: Vec<String>,
}

#[derive(Debug)]
pub struct LexiconNlpAdapter {
    name: String,
    language: String,
    lexicon: HashMap<String, String>,
    /// Longest suffix first.
    suffixes: Vec<(String, String)>,
    gazetteer: HashMap<String, String>,
    gazetteer_span: usize,
    first_names: HashSet<String>,
    person_titles: HashSet<String>,
    org_suffixes: HashSet<String>,
    location_cues: HashSet<String>,
    stopwords: HashSet<String>,
    months: HashSet<String>,
}

fn lowercase_set(words: Vec<String>) -> HashSet<String> {
    words.into_iter().map(|w| w.to_lowercase()).collect()
}

impl LexiconNlpAdapter {
    pub fn from_model(model: LexiconModel) -> Result<Self, NlpError> {
        if model.name.trim().is_empty() {
            return Err(NlpError::ModelLoading("Model has no name".to_string()));
        }

        let mut suffixes: Vec<(String, String)> = model
            .suffixes
            .into_iter()
            .filter(|(suffix, _)| !suffix.is_empty())
            .map(|(suffix, tag)| (suffix.to_lowercase(), tag))
            .collect();
        suffixes.sort_by(|a, b| b.0.chars().count().cmp(&a.0.chars().count()));

        let gazetteer: HashMap<String, String> = model
            .gazetteer
            .into_iter()
            .map(|(phrase, label)| (normalize_phrase(&phrase), label))
            .filter(|(phrase, _)| !phrase.is_empty())
            .collect();
        let gazetteer_span = gazetteer
            .keys()
            .map(|phrase| phrase.split(' ').count())
            .max()
            .unwrap_or(0)
            .min(MAX_GAZETTEER_TOKENS);

        Ok(Self {
            name: model.name,
            language: model.language,
            lexicon: model
                .lexicon
                .into_iter()
                .map(|(word, tag)| (word.to_lowercase(), tag))
                .collect(),
            suffixes,
            gazetteer,
            gazetteer_span,
            first_names: lowercase_set(model.first_names),
            person_titles: lowercase_set(model.person_titles),
            org_suffixes: lowercase_set(model.org_suffixes),
            location_cues: lowercase_set(model.location_cues),
            stopwords: lowercase_set(model.stopwords),
            months: lowercase_set(model.months),
        })
    }

    pub fn from_json(json: &str) -> Result<Self, NlpError> {
        let model: LexiconModel = serde_json::from_str(json)?;
        Self::from_model(model)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, NlpError> {
        let model: LexiconModel = serde_yaml::from_str(yaml)?;
        Self::from_model(model)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, NlpError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(NlpError::ModelLoading(format!(
                "Model path does not exist: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let adapter = match path.extension().and_then(|e| e.to_str()) {
            Some("yml") | Some("yaml") => Self::from_yaml(&content)?,
            _ => Self::from_json(&content)?,
        };
        info!(
            "Loaded lexicon model {} ({}) from {}",
            adapter.name,
            adapter.language,
            path.display()
        );
        Ok(adapter)
    }

    pub fn bundled() -> Result<Self, NlpError> {
        let adapter = Self::from_json(BUNDLED_MODEL)?;
        info!("Loaded bundled lexicon model {} ({})", adapter.name, adapter.language);
        Ok(adapter)
    }

    /// Capitalization only marks a proper noun away from the start of the sequence.
    fn tag_word(&self, word: &str, position: usize) -> String {
        let lower = word.to_lowercase();
        if let Some(tag) = self.lexicon.get(&lower) {
            return tag.clone();
        }
        if !word.is_empty() && word.chars().all(|c| !c.is_alphanumeric()) {
            return "PUNCT".to_string();
        }
        if is_numeric(word) {
            return "NUM".to_string();
        }
        if position > 0 && is_capitalized(word) {
            return "PROPN".to_string();
        }
        self.suffixes
            .iter()
            .find(|(suffix, _)| lower.len() > suffix.len() && lower.ends_with(suffix.as_str()))
            .map(|(_, tag)| tag.clone())
            .unwrap_or_else(|| "NOUN".to_string())
    }

    fn gazetteer_match(&self, lower: &[String], start: usize) -> Option<(usize, &str)> {
        let longest = self.gazetteer_span.min(lower.len() - start);
        (1..=longest).rev().find_map(|len| {
            let phrase = lower[start..start + len].join(" ");
            self.gazetteer.get(&phrase).map(|label| (len, label.as_str()))
        })
    }

    /// Month name, optionally followed by a day and/or a year ("March 3 , 2021").
    fn date_match(&self, words: &[String], lower: &[String], start: usize) -> Option<usize> {
        if !self.months.contains(&lower[start]) || !is_capitalized(&words[start]) {
            return None;
        }

        let mut end = start + 1;
        if end < words.len() && is_day(&words[end]) {
            end += 1;
        }
        if end + 1 < words.len() && words[end] == "," && is_year(&words[end + 1]) {
            end += 2;
        } else if end < words.len() && is_year(&words[end]) {
            end += 1;
        }
        Some(end)
    }

    fn starts_name(&self, word: &str, lower: &str) -> bool {
        is_capitalized(word)
            && !self.stopwords.contains(lower)
            && !self.person_titles.contains(lower)
            && !self.lexicon.contains_key(lower)
    }

    /// Capitalized run starting at `start`; org suffixes may close the run.
    fn capitalized_run(&self, words: &[String], lower: &[String], start: usize) -> usize {
        let mut end = start;
        while end < words.len() {
            let continues = is_capitalized(&words[end]) && !self.stopwords.contains(&lower[end]);
            let closes = end > start && self.org_suffixes.contains(&lower[end]);
            if !(continues || closes) {
                break;
            }
            end += 1;
            if closes && !continues {
                break;
            }
        }
        end
    }

    fn classify_run(&self, lower: &[String], start: usize, end: usize) -> Option<&'static str> {
        let previous = start.checked_sub(1).map(|i| lower[i].as_str());

        if self.org_suffixes.contains(&lower[end - 1]) && end - start > 1 {
            return Some("ORG");
        }
        if previous.map_or(false, |p| self.person_titles.contains(p)) {
            return Some("PERSON");
        }
        if self.first_names.contains(&lower[start]) && end - start > 1 {
            return Some("PERSON");
        }
        if previous.map_or(false, |p| self.location_cues.contains(p)) {
            return Some("GPE");
        }
        if end - start > 1 && start > 0 {
            return Some("ORG");
        }
        None
    }
}

impl NlpPort for LexiconNlpAdapter {
    fn model_info(&self) -> NlpModelInfo {
        NlpModelInfo {
            name: self.name.clone(),
            language: self.language.clone(),
        }
    }

    fn recognize_entities(&self, words: &[String]) -> Result<Vec<EntitySpan>, NlpError> {
        let lower: Vec<String> = words.iter().map(|w| w.to_lowercase()).collect();
        let mut entities = Vec::new();
        let mut i = 0;

        while i < words.len() {
            if let Some((len, label)) = self.gazetteer_match(&lower, i) {
                entities.push(EntitySpan::new(i, i + len, label));
                i += len;
                continue;
            }

            if let Some(end) = self.date_match(words, &lower, i) {
                entities.push(EntitySpan::new(i, end, "DATE"));
                i = end;
                continue;
            }

            if self.starts_name(&words[i], &lower[i]) {
                let end = self.capitalized_run(words, &lower, i);
                if let Some(label) = self.classify_run(&lower, i, end) {
                    entities.push(EntitySpan::new(i, end, label));
                }
                i = end;
                continue;
            }

            if is_year(&words[i]) && i > 0 && lower[i - 1] == "in" {
                entities.push(EntitySpan::new(i, i + 1, "DATE"));
            } else if is_numeric(&words[i]) {
                entities.push(EntitySpan::new(i, i + 1, "CARDINAL"));
            }
            i += 1;
        }

        debug!("Recognized {} entities over {} tokens", entities.len(), words.len());
        Ok(entities)
    }

    fn tag(&self, words: &[String]) -> Result<Vec<String>, NlpError> {
        Ok(words
            .iter()
            .enumerate()
            .map(|(position, word)| self.tag_word(word, position))
            .collect())
    }
}

fn normalize_phrase(phrase: &str) -> String {
    phrase
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_capitalized(word: &str) -> bool {
    word.chars().next().map_or(false, char::is_uppercase)
}

fn is_numeric(word: &str) -> bool {
    word.chars().any(|c| c.is_ascii_digit())
        && word.chars().all(|c| c.is_ascii_digit() || c == ',' || c == '.')
}

fn is_day(word: &str) -> bool {
    let digits = word.trim_end_matches(|c: char| c.is_ascii_alphabetic());
    !digits.is_empty() && matches!(digits.parse::<u32>(), Ok(1..=31))
}

fn is_year(word: &str) -> bool {
    word.len() == 4 && matches!(word.parse::<u32>(), Ok(1000..=2199))
}
