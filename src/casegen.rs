//! Test-case generation: the batch entry point over both authoring modes.
//!
//! Each case is either a natural-language description (decomposed by the
//! model) or a predefined step list (mapped directly); either way the
//! resulting sequence is compiled and persisted. Failures are isolated
//! per case — one bad instruction never aborts a batch — and surface as
//! failure records rather than errors across the API boundary.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info};

use crate::compile::ScriptCompiler;
use crate::config::Config;
use crate::decompose::{DecomposeError, InstructionParser, SequenceGenerator};
use crate::direct::{CallSpec, DirectCallMapper, MapperError};
use crate::llm::{ModelGateway, RetryingInvoker};
use crate::store::{ScriptStore, StoreError};
use crate::task::{TaskContext, TaskSequence};

/// Per-case configuration feeding the script scaffold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseConfig {
    /// Test name, also the filename stem
    pub name: String,

    /// One-line description emitted into the test body
    pub description: String,

    /// URL the before-each hook navigates to
    pub base_url: String,

    /// Default timeout in milliseconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Statements appended to the before-each hook
    #[serde(default)]
    pub setup_actions: Vec<String>,

    /// Statements forming the after-each hook, when present
    #[serde(default)]
    pub teardown_actions: Vec<String>,
}

fn default_timeout() -> u64 {
    30000
}

/// What a case is generated from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum CaseInput {
    /// Free-form description, decomposed by the model
    NaturalLanguage(String),
    /// Predefined structured calls, mapped without the model
    Steps(Vec<CallSpec>),
}

/// One entry in a batch request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseRequest {
    #[serde(flatten)]
    pub input: CaseInput,
    pub config: CaseConfig,
}

/// Errors a single case can fail with.
#[derive(Debug, Error)]
pub enum CaseError {
    #[error(transparent)]
    Decompose(#[from] DecomposeError),

    #[error(transparent)]
    Mapper(#[from] MapperError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result record for one case, success or failure.
#[derive(Debug, Serialize)]
pub struct CaseOutcome {
    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub filepath: Option<PathBuf>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub script: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_count: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// The original input, echoed for diagnosis
    #[serde(flatten)]
    pub input: CaseInput,

    pub config: CaseConfig,
}

impl CaseOutcome {
    fn failure(error: CaseError, input: CaseInput, config: &CaseConfig) -> Self {
        Self {
            success: false,
            filename: None,
            filepath: None,
            script: None,
            task_count: None,
            error: Some(error.to_string()),
            input,
            config: config.clone(),
        }
    }
}

/// Result of a whole batch run.
#[derive(Debug, Serialize)]
pub struct BatchOutcome {
    pub total_cases: usize,
    pub successful_count: usize,
    pub failed_count: usize,
    pub results: Vec<CaseOutcome>,
    pub summary_filename: String,
    pub summary_filepath: PathBuf,
}

/// Generates, compiles and persists test cases.
pub struct CaseGenerator<G> {
    sequences: SequenceGenerator<G>,
    mapper: DirectCallMapper,
    compiler: ScriptCompiler,
    store: ScriptStore,
}

impl<G: ModelGateway> CaseGenerator<G> {
    /// Wire up the full pipeline from a gateway and the process config.
    pub fn new(gateway: G, config: &Config) -> Result<Self, StoreError> {
        let invoker = RetryingInvoker::from_config(gateway, config);
        let parser = InstructionParser::new(invoker);
        Ok(Self {
            sequences: SequenceGenerator::new(parser),
            mapper: DirectCallMapper::new(),
            compiler: ScriptCompiler::new(),
            store: ScriptStore::new(&config.output_dir)?,
        })
    }

    /// Generate one case from a natural-language description.
    ///
    /// Never fails across the API boundary: errors come back inside the
    /// outcome record.
    pub async fn generate_from_instruction(
        &mut self,
        natural_language: &str,
        config: &CaseConfig,
    ) -> CaseOutcome {
        info!(case = %config.name, "generating test case from natural language");
        match self.instruction_case(natural_language, config).await {
            Ok(outcome) => outcome,
            Err(e) => CaseOutcome::failure(
                e,
                CaseInput::NaturalLanguage(natural_language.to_string()),
                config,
            ),
        }
    }

    async fn instruction_case(
        &mut self,
        natural_language: &str,
        config: &CaseConfig,
    ) -> Result<CaseOutcome, CaseError> {
        let context = case_context(config);
        let sequence = self.sequences.generate(natural_language, &context).await?;
        self.persist(
            sequence,
            CaseInput::NaturalLanguage(natural_language.to_string()),
            config,
        )
    }

    /// Generate one case from a predefined step list.
    pub fn generate_from_steps(&mut self, steps: &[CallSpec], config: &CaseConfig) -> CaseOutcome {
        info!(case = %config.name, "generating test case from steps");
        match self.steps_case(steps, config) {
            Ok(outcome) => outcome,
            Err(e) => CaseOutcome::failure(e, CaseInput::Steps(steps.to_vec()), config),
        }
    }

    fn steps_case(
        &mut self,
        steps: &[CallSpec],
        config: &CaseConfig,
    ) -> Result<CaseOutcome, CaseError> {
        let context = case_context(config);
        let sequence = self
            .mapper
            .map_batch(steps, &context)?
            .with_description(config.description.clone());
        self.persist(sequence, CaseInput::Steps(steps.to_vec()), config)
    }

    fn persist(
        &self,
        sequence: TaskSequence,
        input: CaseInput,
        config: &CaseConfig,
    ) -> Result<CaseOutcome, CaseError> {
        let script = self.compiler.compile_sequence(&sequence, config);
        let filename = self.store.spec_filename(&config.name);
        let filepath = self.store.save(&filename, &script)?;
        Ok(CaseOutcome {
            success: true,
            filename: Some(filename),
            filepath: Some(filepath),
            task_count: Some(sequence.tasks().len()),
            script: Some(script),
            error: None,
            input,
            config: config.clone(),
        })
    }

    /// Process a batch of cases, isolating failures per case, and emit a
    /// combined summary script enumerating the successful ones.
    pub async fn generate_batch(&mut self, cases: &[CaseRequest]) -> Result<BatchOutcome, StoreError> {
        info!(case_count = cases.len(), "generating test case batch");

        let mut results = Vec::with_capacity(cases.len());
        for (index, case) in cases.iter().enumerate() {
            info!(
                case = %case.config.name,
                progress = %format!("{}/{}", index + 1, cases.len()),
                "processing case"
            );
            let outcome = match &case.input {
                CaseInput::NaturalLanguage(text) => {
                    self.generate_from_instruction(text, &case.config).await
                }
                CaseInput::Steps(steps) => self.generate_from_steps(steps, &case.config),
            };
            if let Some(error) = &outcome.error {
                error!(case = %case.config.name, %error, "case generation failed");
            }
            results.push(outcome);
        }

        let successful_count = results.iter().filter(|r| r.success).count();
        let summary_script = summary_script(&results);
        let summary_filename = format!("test_suite_{}.spec.ts", chrono::Utc::now().timestamp());
        let summary_filepath = self.store.save(&summary_filename, &summary_script)?;

        Ok(BatchOutcome {
            total_cases: cases.len(),
            successful_count,
            failed_count: results.len() - successful_count,
            results,
            summary_filename,
            summary_filepath,
        })
    }

    /// The store behind this generator.
    pub fn store(&self) -> &ScriptStore {
        &self.store
    }
}

fn case_context(config: &CaseConfig) -> TaskContext {
    TaskContext {
        page_url: Some(config.base_url.clone()),
        page_title: Some(config.name.clone()),
        previous_actions: vec![],
        current_state: Default::default(),
    }
}

/// Scaffold-only suite script enumerating the successful cases.
fn summary_script(results: &[CaseOutcome]) -> String {
    let successful: Vec<&CaseOutcome> = results.iter().filter(|r| r.success).collect();

    let mut lines = vec![
        "import { expect } from \"@playwright/test\";".to_string(),
        "import { test } from \"./fixture\";".to_string(),
        String::new(),
        "// Auto-generated test suite".to_string(),
        format!(
            "// Generated at: {}",
            chrono::Utc::now().format("%Y-%m-%d %H:%M:%S")
        ),
        format!("// Contains {} test cases", successful.len()),
        String::new(),
    ];

    for outcome in successful {
        lines.extend([
            format!(
                "test(\"{}\", async ({{ page, ai, aiQuery, aiAssert, aiInput, aiTap, aiScroll, aiWaitFor }}) => {{",
                outcome.config.name
            ),
            format!("  // {}", outcome.config.description),
            format!("  await page.goto(\"{}\");", outcome.config.base_url),
            "  await page.waitForLoadState(\"networkidle\");".to_string(),
            String::new(),
            "  // TODO: fill in the steps from the matching standalone spec file".to_string(),
            String::new(),
            "});".to_string(),
            String::new(),
        ]);
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use async_trait::async_trait;
    use serde_json::json;

    use super::*;
    use crate::llm::{ChatMessage, ChatOptions, LlmError};

    /// Gateway that always answers with a canned decomposition.
    struct CannedGateway {
        reply: String,
    }

    #[async_trait]
    impl ModelGateway for CannedGateway {
        async fn converse(
            &self,
            _messages: &[ChatMessage],
            _options: &ChatOptions,
        ) -> Result<String, LlmError> {
            Ok(self.reply.clone())
        }

        fn model_name(&self) -> &str {
            "canned-model"
        }
    }

    fn test_config(dir: &std::path::Path) -> Config {
        let mut config = Config::new("test-key".to_string(), "canned-model".to_string());
        config.output_dir = dir.to_path_buf();
        config.retry_delay = std::time::Duration::from_millis(1);
        config
    }

    fn case_config() -> CaseConfig {
        CaseConfig {
            name: "example search".to_string(),
            description: "search example.com for hello".to_string(),
            base_url: "https://example.com".to_string(),
            timeout: 30000,
            setup_actions: vec![],
            teardown_actions: vec![],
        }
    }

    const DECOMPOSITION: &str = r#"[
        {"type": "action", "description": "open example.com", "target": "example.com", "action_type": "navigate"},
        {"type": "action", "description": "type hello into the search box", "target": "search box", "value": "hello", "action_type": "input"},
        {"type": "action", "description": "click the search button", "target": "search button", "action_type": "click"}
    ]"#;

    #[tokio::test]
    async fn test_natural_language_case_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let gateway = CannedGateway {
            reply: DECOMPOSITION.to_string(),
        };
        let mut generator = CaseGenerator::new(gateway, &test_config(dir.path())).unwrap();

        let outcome = generator
            .generate_from_instruction(
                "open example.com; type hello into the search box; click the search button",
                &case_config(),
            )
            .await;

        assert!(outcome.success, "error: {:?}", outcome.error);
        assert_eq!(outcome.task_count, Some(3));

        let script = outcome.script.unwrap();
        let goto = script.find("await page.goto(\"example.com\")").unwrap();
        let input = script.find("await aiInput('hello','search box');").unwrap();
        let tap = script.find("await aiTap('search button');").unwrap();
        assert!(goto < input && input < tap);

        let saved = std::fs::read_to_string(outcome.filepath.unwrap()).unwrap();
        assert_eq!(saved, script);
    }

    #[tokio::test]
    async fn test_steps_case_uses_configured_description() {
        let dir = tempfile::tempdir().unwrap();
        let gateway = CannedGateway {
            reply: "unused".to_string(),
        };
        let mut generator = CaseGenerator::new(gateway, &test_config(dir.path())).unwrap();

        let steps = vec![
            CallSpec {
                method: "aiInput".to_string(),
                args: vec![json!("search box"), json!("hello")],
                kwargs: HashMap::new(),
            },
            CallSpec {
                method: "aiAssert".to_string(),
                args: vec![json!("results are shown")],
                kwargs: HashMap::new(),
            },
        ];
        let outcome = generator.generate_from_steps(&steps, &case_config());

        assert!(outcome.success);
        let script = outcome.script.unwrap();
        assert!(script.contains("// search example.com for hello"));
        assert!(script.contains("await aiAssert('results are shown');"));
    }

    #[tokio::test]
    async fn test_batch_isolates_failures() {
        let dir = tempfile::tempdir().unwrap();
        let gateway = CannedGateway {
            reply: DECOMPOSITION.to_string(),
        };
        let mut generator = CaseGenerator::new(gateway, &test_config(dir.path())).unwrap();

        let cases = vec![
            CaseRequest {
                input: CaseInput::Steps(vec![CallSpec {
                    method: "aiNoSuchMethod".to_string(),
                    args: vec![],
                    kwargs: HashMap::new(),
                }]),
                config: case_config(),
            },
            CaseRequest {
                input: CaseInput::NaturalLanguage("open example.com and search".to_string()),
                config: case_config(),
            },
        ];

        let batch = generator.generate_batch(&cases).await.unwrap();
        assert_eq!(batch.total_cases, 2);
        assert_eq!(batch.failed_count, 1);
        assert_eq!(batch.successful_count, 1);
        assert!(!batch.results[0].success);
        assert!(batch.results[0]
            .error
            .as_deref()
            .unwrap()
            .contains("aiNoSuchMethod"));
        assert!(batch.results[1].success);

        let summary = std::fs::read_to_string(&batch.summary_filepath).unwrap();
        assert!(summary.contains("// Contains 1 test cases"));
        assert!(summary.contains("test(\"example search\""));
    }

    #[test]
    fn test_case_request_wire_shape() {
        let raw = r#"{
            "type": "natural_language",
            "data": "open example.com",
            "config": {
                "name": "smoke",
                "description": "smoke test",
                "base_url": "https://example.com"
            }
        }"#;
        let request: CaseRequest = serde_json::from_str(raw).unwrap();
        assert!(matches!(request.input, CaseInput::NaturalLanguage(_)));
        assert_eq!(request.config.timeout, 30000);
    }
}
