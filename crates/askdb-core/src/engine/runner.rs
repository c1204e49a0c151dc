use crate::errors::StoreError;
use crate::gateway::ExecutionGateway;
use crate::model::{QueryClass, QueryResult, SynthesizedQuery};
use crate::prompt::build_prompt;
use crate::retrieval::Retriever;
use crate::storage::ExampleStore;
use crate::synth::Synthesizer;

/// End-to-end pipeline for one user question:
/// retrieve examples -> build prompt -> synthesize -> classify -> execute.
///
/// One question is processed to completion before the next; there is no
/// in-flight concurrency and no cancellation once synthesis starts.
pub struct Pipeline {
    pub examples: ExampleStore,
    pub retriever: Retriever,
    pub synthesizer: Synthesizer,
    pub gateway: ExecutionGateway,
    pub retrieve_k: usize,
}

/// What happened to one question. A WRITE without a supplied secret is not
/// an error: the caller is told the statement is gated and can re-ask with
/// credentials.
#[derive(Debug)]
pub enum AskOutcome {
    Executed {
        query: SynthesizedQuery,
        examples_used: Vec<(String, String)>,
        result: QueryResult,
    },
    WriteGated {
        query: SynthesizedQuery,
        examples_used: Vec<(String, String)>,
    },
}

impl Pipeline {
    pub fn new(
        examples: ExampleStore,
        synthesizer: Synthesizer,
        gateway: ExecutionGateway,
        retrieve_k: usize,
    ) -> Self {
        let retriever = Retriever::new(examples.clone());
        Self {
            examples,
            retriever,
            synthesizer,
            gateway,
            retrieve_k,
        }
    }

    pub async fn ask(&self, question: &str, secret: Option<&str>) -> anyhow::Result<AskOutcome> {
        let question = question.trim();
        if question.is_empty() {
            anyhow::bail!("question must not be empty");
        }

        let examples_used = self.retriever.retrieve(question, self.retrieve_k);
        tracing::debug!("retrieved {} example(s)", examples_used.len());

        let prompt = build_prompt(question, &examples_used);
        let query = self.synthesizer.synthesize(&prompt).await?;

        match query.classification {
            QueryClass::Read => {
                let result = self.gateway.execute(&query.normalized_sql, false, None)?;
                Ok(AskOutcome::Executed {
                    query,
                    examples_used,
                    result,
                })
            }
            QueryClass::Write => {
                if secret.is_none() {
                    return Ok(AskOutcome::WriteGated {
                        query,
                        examples_used,
                    });
                }
                let result = self.gateway.execute(&query.normalized_sql, true, secret)?;
                Ok(AskOutcome::Executed {
                    query,
                    examples_used,
                    result,
                })
            }
        }
    }

    /// Feedback loop: promote an accepted (question, sql) pair to an example.
    pub fn save_example(&self, question: &str, sql: &str) -> Result<(), StoreError> {
        self.examples.save_example(question, sql)
    }
}
