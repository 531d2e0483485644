//! Single-pass assessment of one address.

use crate::address::SolanaAddress;
use crate::assessment::summary;
use crate::assessment::types::{
    AssessmentDetails, AssessmentError, AssessmentRequest, LocalEvidence, RiskAssessment,
};
use crate::observability::metrics;
use crate::scoring::{self, AggregatedSignal};
use crate::sources::{GoPlusClient, HeliusClient, SourceClients};
use crate::storage::{BlacklistStore, Database, HistoryStore, NewHistoryRecord, StorageError};

/// Transactions kept in the evidence document.
const DETAIL_TRANSACTIONS: usize = 10;

/// Runs the assessment pipeline against shared stores and source clients.
#[derive(Clone, Debug)]
pub struct Assessor {
    blacklist: BlacklistStore,
    history: HistoryStore,
    helius: HeliusClient,
    goplus: GoPlusClient,
}

impl Assessor {
    pub fn new(db: &Database, sources: SourceClients) -> Self {
        Self {
            blacklist: db.blacklist(),
            history: db.history(),
            helius: sources.helius,
            goplus: sources.goplus,
        }
    }

    /// Assess one address and append exactly one history record.
    ///
    /// Source failures degrade the result instead of failing it. Nothing is
    /// written when this returns an error.
    #[tracing::instrument(skip_all, fields(address = %request.address, use_goplus = request.use_goplus))]
    pub async fn assess(&self, request: AssessmentRequest) -> Result<RiskAssessment, AssessmentError> {
        let address = SolanaAddress::parse(&request.address)?;

        let (local, activity, reputation) = tokio::join!(
            self.blacklist.get(&address),
            self.helius.fetch(&address),
            async {
                if request.use_goplus {
                    Some(self.goplus.fetch(&address).await)
                } else {
                    None
                }
            },
        );
        let matches: Vec<_> = local?.into_iter().collect();
        let reputation = reputation.transpose()?;

        let signal = AggregatedSignal {
            local_matches: matches.len(),
            external_positives: reputation
                .as_ref()
                .and_then(|slot| slot.ready())
                .map(|report| report.positives())
                .unwrap_or_default(),
            transaction_count: activity.transaction_count(),
            has_assets: activity.has_assets(),
        };
        let verdict = scoring::evaluate(&signal);
        let summary = summary::render(matches.len(), &activity, reputation.as_ref(), verdict);

        let mut helius = activity;
        helius.transactions = helius.transactions.map(|mut list| {
            list.truncate(DETAIL_TRANSACTIONS);
            list
        });
        let details = AssessmentDetails {
            local: LocalEvidence { matches },
            helius,
            goplus: reputation,
        };

        let details_json = serde_json::to_value(&details).map_err(StorageError::from)?;
        let history_id = self
            .history
            .append(NewHistoryRecord {
                address: address.clone(),
                summary: summary.clone(),
                verdict,
                details: details_json,
                errors: Vec::new(),
            })
            .await?;

        metrics::record_assessment(verdict.label.as_str());
        tracing::info!(
            score = verdict.score,
            label = %verdict.label,
            local_matches = signal.local_matches,
            positives = signal.external_positives.len(),
            history_id,
            "Assessment completed"
        );

        Ok(RiskAssessment {
            address,
            summary,
            risk: verdict,
            details,
            history_id,
        })
    }
}
