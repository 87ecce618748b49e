use serde::{Deserialize, Deserializer};
use wordpeek_core::{DefinitionEntry, LookupError, LookupResult};

#[derive(Deserialize, Debug)]
struct ApiEntry {
    #[serde(default)]
    phonetic: Option<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    phonetics: Vec<ApiPhonetic>,
    #[serde(default, deserialize_with = "lenient_list")]
    meanings: Vec<ApiMeaning>,
}

#[derive(Deserialize, Debug)]
struct ApiPhonetic {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    audio: Option<String>,
}

#[derive(Deserialize, Debug)]
struct ApiMeaning {
    #[serde(rename = "partOfSpeech", default)]
    part_of_speech: Option<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    definitions: Vec<ApiDefinition>,
}

#[derive(Deserialize, Debug)]
struct ApiDefinition {
    #[serde(default)]
    definition: Option<String>,
    #[serde(default)]
    example: Option<String>,
}

/// A `null` list reads as empty and `null` items are skipped
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let items: Option<Vec<Option<T>>> = Option::deserialize(deserializer)?;
    Ok(items.unwrap_or_default().into_iter().flatten().collect())
}

fn malformed(detail: impl Into<String>) -> LookupResult {
    LookupResult::NetworkError(LookupError::Malformed(detail.into()))
}

fn non_empty(s: &Option<String>) -> Option<&str> {
    s.as_deref().filter(|s| !s.is_empty())
}

fn is_absolute_http(url: &str) -> bool {
    url.starts_with("https://") || url.starts_with("http://")
}

/// Parse a successful response body into a lookup result
pub fn parse_entries(body: &[u8]) -> LookupResult {
    let json: serde_json::Value = match serde_json::from_slice(body) {
        Ok(json) => json,
        Err(e) => return malformed(format!("invalid JSON: {e}")),
    };

    let Some(entries) = json.as_array() else {
        return malformed("expected a JSON array of entries");
    };

    let Some(first) = entries.first() else {
        return malformed("empty entry list");
    };

    let entry: ApiEntry = match serde_json::from_value(first.clone()) {
        Ok(entry) => entry,
        Err(e) => return malformed(format!("unexpected entry shape: {e}")),
    };

    extract(entry)
}

fn extract(entry: ApiEntry) -> LookupResult {
    let Some(meaning) = entry.meanings.iter().find(|m| !m.definitions.is_empty()) else {
        return LookupResult::NotFound;
    };
    let first = &meaning.definitions[0];

    let phonetic = non_empty(&entry.phonetic)
        .or_else(|| entry.phonetics.first().and_then(|p| non_empty(&p.text)))
        .unwrap_or_default()
        .to_string();

    let audio_url = entry
        .phonetics
        .iter()
        .filter_map(|p| p.audio.as_deref())
        .find(|audio| is_absolute_http(audio))
        .map(str::to_string);

    LookupResult::Success(DefinitionEntry {
        phonetic,
        audio_url,
        part_of_speech: meaning.part_of_speech.clone().unwrap_or_default(),
        definition: first.definition.clone().unwrap_or_default(),
        example: non_empty(&first.example).map(str::to_string),
    })
}
