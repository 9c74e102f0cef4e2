use serde::{Deserialize, Serialize};

/// Categories of detectable conversation insights
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    PricingObjection,
    BuyingSignal,
    CompetitorMention,
    NextStep,
    StallTactic,
}

impl InsightKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PricingObjection => "pricing_objection",
            Self::BuyingSignal => "buying_signal",
            Self::CompetitorMention => "competitor_mention",
            Self::NextStep => "next_step",
            Self::StallTactic => "stall_tactic",
        }
    }
}

impl std::fmt::Display for InsightKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single detection rule: a phrase to match in lowercased transcript
/// text, the confidence it carries, and the suggested agent response
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub phrase: &'static str,
    pub confidence: f64,
    pub suggestion: &'static str,
}

impl Rule {
    const fn new(phrase: &'static str, confidence: f64, suggestion: &'static str) -> Self {
        Self {
            phrase,
            confidence,
            suggestion,
        }
    }
}

const PRICING_OBJECTION_RULES: &[Rule] = &[
    Rule::new("too expensive", 0.9, "Acknowledge the concern, then pivot to ROI and value delivered."),
    Rule::new("over our budget", 0.9, "Ask what their budget range is — explore flexible pricing or phased rollout."),
    Rule::new("out of budget", 0.9, "Ask what their budget range is — explore flexible pricing or phased rollout."),
    Rule::new("can't afford", 0.85, "Explore payment plans or a smaller starter package."),
    Rule::new("cost is too high", 0.85, "Break down the cost per user/month to reframe the investment."),
    Rule::new("pricing is steep", 0.8, "Compare against the cost of NOT solving the problem."),
    Rule::new("cheaper option", 0.8, "Differentiate on value, support, and total cost of ownership."),
    Rule::new("price is a concern", 0.8, "Validate their concern, then present a business case with projected savings."),
    Rule::new("budget constraints", 0.75, "Propose a phased implementation to spread costs."),
    Rule::new("not in the budget", 0.85, "Ask about their budget cycle — can this be planned for next quarter?"),
    Rule::new("spend that much", 0.7, "Anchor the conversation on business impact, not just price."),
];

const BUYING_SIGNAL_RULES: &[Rule] = &[
    Rule::new("send me a proposal", 0.95, "Prepare and send the proposal within 24 hours. Strike while interest is hot."),
    Rule::new("send a proposal", 0.95, "Prepare and send the proposal within 24 hours. Strike while interest is hot."),
    Rule::new("ready to move forward", 0.95, "Confirm the scope and timeline, then initiate onboarding steps."),
    Rule::new("move forward", 0.9, "Clarify the next step — contract review, pilot, or sign-off."),
    Rule::new("sign the contract", 0.95, "Prepare the contract and schedule a signing call."),
    Rule::new("start a pilot", 0.9, "Define the pilot scope, success criteria, and timeline."),
    Rule::new("when can we start", 0.9, "Provide a concrete onboarding timeline."),
    Rule::new("how soon can", 0.85, "This signals urgency — respond with a fast-track option."),
    Rule::new("ready to buy", 0.95, "Close the deal. Confirm the order details and next steps."),
    Rule::new("let's do it", 0.85, "Confirm their decision and outline the immediate next steps."),
    Rule::new("looks good", 0.6, "Positive signal — ask a closing question to advance the deal."),
    Rule::new("interested in", 0.5, "Moderate interest — explore what specifically excites them."),
    Rule::new("i like", 0.5, "Positive sentiment — reinforce the value they see."),
];

const COMPETITOR_MENTION_RULES: &[Rule] = &[
    Rule::new("competitor", 0.8, "Ask what they like about the competitor, then differentiate on your strengths."),
    Rule::new("alternative solution", 0.75, "Understand their evaluation criteria and position your unique advantages."),
    Rule::new("other vendor", 0.8, "Ask where they are in the evaluation — are they actively comparing?"),
    Rule::new("other provider", 0.8, "Ask where they are in the evaluation — are they actively comparing?"),
    Rule::new("looking at other", 0.7, "Understand their timeline and what would make them choose you."),
    Rule::new("comparing with", 0.8, "Ask what criteria matter most — tailor your pitch accordingly."),
    Rule::new("evaluated another", 0.75, "Ask what they learned and how you can address any gaps."),
    Rule::new("switching from", 0.85, "They're already considering a change — understand their pain points with the current solution."),
];

const NEXT_STEP_RULES: &[Rule] = &[
    Rule::new("schedule a follow-up", 0.9, "Suggest specific dates/times. Don't leave it open-ended."),
    Rule::new("book a meeting", 0.9, "Send a calendar invite before they leave the call."),
    Rule::new("set up a demo", 0.9, "Confirm the demo scope and who should attend."),
    Rule::new("loop in my team", 0.85, "Great — ask who specifically and offer to present to them."),
    Rule::new("get back to you", 0.6, "Pin down a specific date: 'When works best to reconnect?'"),
    Rule::new("follow up next week", 0.8, "Confirm the day and send a calendar hold."),
    Rule::new("talk to my manager", 0.7, "Offer to join the internal discussion or provide a one-pager for their manager."),
    Rule::new("internal discussion", 0.65, "Ask what information they need for the internal discussion."),
    Rule::new("discuss internally", 0.65, "Offer a concise summary document they can share internally."),
];

const STALL_TACTIC_RULES: &[Rule] = &[
    Rule::new("not a priority right now", 0.85, "Ask what IS a priority and whether this problem will get worse over time."),
    Rule::new("maybe next quarter", 0.7, "Understand what changes next quarter and create urgency for acting sooner."),
    Rule::new("need more time", 0.6, "Ask what specific information they need to make a decision."),
    Rule::new("think about it", 0.65, "Ask what specific concerns remain — try to address them now."),
    Rule::new("not ready yet", 0.7, "Ask what would make them ready and what's blocking the decision."),
    Rule::new("timing isn't right", 0.75, "Explore what would make the timing right — is there a triggering event?"),
    Rule::new("circle back later", 0.6, "Pin down a specific date and send a calendar invite."),
];

const CATEGORIES: &[(InsightKind, &[Rule])] = &[
    (InsightKind::PricingObjection, PRICING_OBJECTION_RULES),
    (InsightKind::BuyingSignal, BUYING_SIGNAL_RULES),
    (InsightKind::CompetitorMention, COMPETITOR_MENTION_RULES),
    (InsightKind::NextStep, NEXT_STEP_RULES),
    (InsightKind::StallTactic, STALL_TACTIC_RULES),
];

/// The full set of detection rules, grouped by category.
///
/// Phrases are plain lowercase ASCII checked as case-insensitive
/// substrings. Category iteration order is stable so analysis output is
/// deterministic.
#[derive(Debug, Clone)]
pub struct RuleCatalog {
    categories: &'static [(InsightKind, &'static [Rule])],
}

impl RuleCatalog {
    /// The built-in catalog.
    pub fn builtin() -> Self {
        Self {
            categories: CATEGORIES,
        }
    }

    /// Iterate over (category, rule) pairs in stable order.
    pub fn iter(&self) -> impl Iterator<Item = (InsightKind, &'static Rule)> + '_ {
        self.categories
            .iter()
            .flat_map(|(kind, rules)| rules.iter().map(move |rule| (*kind, rule)))
    }

    /// Rules for a single category.
    pub fn rules_for(&self, kind: InsightKind) -> &'static [Rule] {
        self.categories
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, rules)| *rules)
            .unwrap_or(&[])
    }

    pub fn rule_count(&self) -> usize {
        self.categories.iter().map(|(_, rules)| rules.len()).sum()
    }
}
