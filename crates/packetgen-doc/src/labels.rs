//! Fixed headings per output language.

use packetgen_schema::DocCategory;

/// Headings and table captions used by the renderer.
#[derive(Debug, Clone, Copy)]
pub struct Labels {
    pub binding_version: &'static str,
    pub api: &'static str,
    pub api_intro: &'static str,
    pub status_codes: &'static str,
    pub callbacks: &'static str,
    pub callbacks_intro: &'static str,
    pub function_id: &'static str,
    pub request: &'static str,
    pub response: &'static str,
    pub frame: &'static str,
    pub no_response: &'static str,
    pub bytes: &'static str,
    pub name: &'static str,
    pub ty: &'static str,
    pub count: &'static str,
    pub direction: &'static str,
    pub no_elements: &'static str,
    basic: &'static str,
    advanced: &'static str,
    low_level: &'static str,
}

const EN: Labels = Labels {
    binding_version: "Binding version",
    api: "API",
    api_intro: "Every call returns a status code. Values returned by the device are \
                written to the output elements of the call.",
    status_codes: "Status codes",
    callbacks: "Callbacks",
    callbacks_intro: "Callbacks are sent by the device without a request. A callback \
                      without a registered handler is discarded.",
    function_id: "Function id",
    request: "request",
    response: "response",
    frame: "frame",
    no_response: "no response",
    bytes: "bytes",
    name: "Name",
    ty: "Type",
    count: "Count",
    direction: "Direction",
    no_elements: "No elements.",
    basic: "Basic Functions",
    advanced: "Advanced Functions",
    low_level: "Low-Level Functions",
};

const DE: Labels = Labels {
    binding_version: "Bindingsversion",
    api: "API",
    api_intro: "Jeder Aufruf gibt einen Statuscode zurueck. Vom Geraet \
                zurueckgegebene Werte werden in die Ausgabeelemente geschrieben.",
    status_codes: "Statuscodes",
    callbacks: "Callbacks",
    callbacks_intro: "Callbacks werden vom Geraet ohne Anfrage gesendet. Ein Callback \
                      ohne registrierte Funktion wird verworfen.",
    function_id: "Funktions-ID",
    request: "Anfrage",
    response: "Antwort",
    frame: "Rahmen",
    no_response: "keine Antwort",
    bytes: "Bytes",
    name: "Name",
    ty: "Typ",
    count: "Anzahl",
    direction: "Richtung",
    no_elements: "Keine Elemente.",
    basic: "Grundfunktionen",
    advanced: "Fortgeschrittene Funktionen",
    low_level: "Interne Funktionen",
};

impl Labels {
    /// Labels for `lang`, English if the language is not known.
    pub fn for_language(lang: &str) -> &'static Labels {
        match lang {
            "de" => &DE,
            _ => &EN,
        }
    }

    /// Section title for a documentation category.
    pub fn category(&self, category: DocCategory) -> &'static str {
        match category {
            DocCategory::Basic => self.basic,
            DocCategory::Advanced => self.advanced,
            DocCategory::LowLevel => self.low_level,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_english_titles_match_categories() {
        let en = Labels::for_language("en");
        for category in [DocCategory::Basic, DocCategory::Advanced, DocCategory::LowLevel] {
            assert_eq!(en.category(category), category.title());
        }
    }

    #[test]
    fn test_unknown_language_falls_back() {
        assert_eq!(Labels::for_language("fr").callbacks, "Callbacks");
        assert_eq!(Labels::for_language("de").status_codes, "Statuscodes");
    }
}
