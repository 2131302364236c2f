//! Extraction vocabulary.
//!
//! Every word list the extractors consult lives here so that the algorithms
//! can be exercised against substituted vocabularies. Lists cover English and
//! Portuguese business documents; a YAML file can replace any of them.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Immutable word lists consumed by the pattern table and keyword extractor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vocabulary {
    /// Lines containing any of these (case-insensitive) are placeholder noise
    #[serde(default = "default_irrelevance_terms")]
    pub irrelevance_terms: Vec<String>,

    /// Trailing words stripped from metric labels ("85% of migration completed")
    #[serde(default = "default_completion_words")]
    pub completion_words: Vec<String>,

    /// Verbs linking a label to its percentage ("budget reached 60%")
    #[serde(default = "default_status_verbs")]
    pub status_verbs: Vec<String>,

    /// Connectors in "NN% of label" shapes
    #[serde(default = "default_of_connectors")]
    pub of_connectors: Vec<String>,

    #[serde(default = "default_status_keys")]
    pub status_keys: Vec<String>,

    #[serde(default = "default_situation_keys")]
    pub situation_keys: Vec<String>,

    #[serde(default = "default_responsible_keys")]
    pub responsible_keys: Vec<String>,

    /// Lower-case words never reported as themes
    #[serde(default = "default_stopwords")]
    pub stopwords: Vec<String>,

    /// Lower-case words present in nearly every business document
    #[serde(default = "default_generic_terms")]
    pub generic_terms: Vec<String>,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self {
            irrelevance_terms: default_irrelevance_terms(),
            completion_words: default_completion_words(),
            status_verbs: default_status_verbs(),
            of_connectors: default_of_connectors(),
            status_keys: default_status_keys(),
            situation_keys: default_situation_keys(),
            responsible_keys: default_responsible_keys(),
            stopwords: default_stopwords(),
            generic_terms: default_generic_terms(),
        }
    }
}

impl Vocabulary {
    /// Load a vocabulary from a YAML file; missing lists keep their defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read vocabulary file: {}", path.display()))?;

        Self::from_yaml(&content)
            .with_context(|| format!("Failed to parse vocabulary file: {}", path.display()))
    }

    /// Parse a vocabulary from YAML content
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).context("Failed to parse vocabulary YAML")
    }
}

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn default_irrelevance_terms() -> Vec<String> {
    words(&[
        "example",
        "exemplo",
        "template",
        "placeholder",
        "lorem ipsum",
        "fill in",
        "preencher",
        "dummy",
        "fictitious",
        "fictício",
        "ficticio",
        "xx%",
    ])
}

fn default_completion_words() -> Vec<String> {
    words(&[
        "completed",
        "complete",
        "concluded",
        "concluído",
        "concluido",
        "concluída",
        "concluida",
        "finalized",
        "finalised",
        "finalizado",
        "finalizada",
        "done",
        "achieved",
        "executed",
        "executado",
        "executada",
        "realizado",
        "realizada",
    ])
}

fn default_status_verbs() -> Vec<String> {
    words(&[
        "stands at",
        "is at",
        "reached",
        "achieved",
        "completed",
        "concluded",
        "atingiu",
        "alcançou",
        "está em",
        "esta em",
        "is",
        "at",
        "em",
    ])
}

fn default_of_connectors() -> Vec<String> {
    words(&["of", "de", "do", "da", "dos", "das"])
}

fn default_status_keys() -> Vec<String> {
    words(&["status", "estado"])
}

fn default_situation_keys() -> Vec<String> {
    words(&["situation", "situação", "situacao"])
}

fn default_responsible_keys() -> Vec<String> {
    words(&["responsible", "owner", "responsável", "responsavel", "responsáveis"])
}

fn default_stopwords() -> Vec<String> {
    words(&[
        // english
        "about", "above", "after", "again", "against", "along", "although", "among", "another",
        "because", "before", "being", "below", "between", "could", "during", "every", "first",
        "further", "having", "however", "itself", "might", "never", "other", "others", "often",
        "perhaps", "rather", "really", "several", "should", "since", "something", "still",
        "their", "there", "therefore", "these", "those", "though", "through", "today", "under",
        "until", "where", "which", "while", "within", "without", "would", "yours",
        // portuguese
        "sobre", "entre", "desde", "durante", "ainda", "quando", "porque", "então", "entao",
        "assim", "sendo", "estão", "estao", "foram", "forma", "outros", "outras", "mesmo",
        "mesma", "muito", "muitos", "todos", "todas", "nossa", "nosso", "essas", "esses",
        "estas", "estes", "aquele", "aquela", "também", "tambem", "apenas", "pelos", "pelas",
        "segundo", "através", "atraves", "seguinte", "seguintes", "neste", "nesta", "possui",
    ])
}

fn default_generic_terms() -> Vec<String> {
    words(&[
        "document", "documents", "documento", "documentos", "report", "reports", "relatório",
        "relatorio", "analysis", "análise", "analise", "project", "projects", "projeto",
        "projetos", "summary", "resumo", "executive", "executivo", "executiva", "information",
        "informação", "informacao", "informações", "total", "dados", "status", "página",
        "pagina", "table", "tabela", "section", "seção", "secao", "company", "empresa",
    ])
}
