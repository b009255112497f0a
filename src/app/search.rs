// SPDX-License-Identifier: GPL-3.0-only

//! Search field and results panel

use crate::classifier::{SearchPayload, SearchResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultCard {
    /// 1-based position in the list
    pub number: usize,
    pub name: String,
    pub scientific_name: String,
    pub details: Vec<(&'static str, String)>,
}

impl ResultCard {
    fn from_result(number: usize, result: &SearchResult) -> Self {
        let details = [
            ("Karakteristik :", &result.physical_characteristics),
            ("Habitat :", &result.habitat),
            ("Manfaat & Makna :", &result.benefits_or_meaning),
        ]
        .into_iter()
        .filter_map(|(label, value)| {
            value
                .as_ref()
                .filter(|v| !v.is_empty())
                .map(|v| (label, v.clone()))
        })
        .collect();

        Self {
            number,
            name: result.name.clone(),
            scientific_name: result.scientific_name.clone().unwrap_or_default(),
            details,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SearchPanel {
    /// No search run yet
    #[default]
    Idle,
    /// The last search matched nothing
    Empty,
    Results(Vec<ResultCard>),
}

impl SearchPanel {
    pub fn from_payload(payload: &SearchPayload) -> Self {
        if payload.results.is_empty() {
            return SearchPanel::Empty;
        }
        SearchPanel::Results(
            payload
                .results
                .iter()
                .enumerate()
                .map(|(i, r)| ResultCard::from_result(i + 1, r))
                .collect(),
        )
    }

    pub fn cards(&self) -> &[ResultCard] {
        match self {
            SearchPanel::Results(cards) => cards,
            _ => &[],
        }
    }

    /// Heading above the results
    pub fn header(&self) -> Option<String> {
        match self {
            SearchPanel::Idle => None,
            SearchPanel::Empty => Some("Tidak Ada Hasil".to_string()),
            SearchPanel::Results(cards) => Some(format!(
                "Hasil Pencarian - Ditemukan {} bunga",
                cards.len()
            )),
        }
    }
}

/// Text shown in the empty state
pub const EMPTY_STATE_TEXT: &str = "Tidak ditemukan bunga yang cocok dengan pencarian Anda";

/// Query text and the results panel
#[derive(Debug, Default)]
pub struct SearchState {
    query: String,
    panel: SearchPanel,
    mounted: bool,
}

impl SearchState {
    pub fn new() -> Self {
        Self {
            mounted: true,
            ..Default::default()
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn push_char(&mut self, c: char) {
        self.query.push(c);
    }

    pub fn pop_char(&mut self) {
        self.query.pop();
    }

    pub fn panel(&self) -> &SearchPanel {
        &self.panel
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn set_mounted(&mut self, mounted: bool) {
        self.mounted = mounted;
        if !mounted {
            self.panel = SearchPanel::Idle;
        }
    }

    /// Show results; ignored when the results container is gone
    pub fn show(&mut self, payload: &SearchPayload) -> bool {
        if !self.mounted {
            return false;
        }
        self.panel = SearchPanel::from_payload(payload);
        true
    }
}
