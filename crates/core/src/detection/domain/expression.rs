/// Expression classes recognized by the classifier, in the FER+ output
/// order.
///
/// The declaration order doubles as the tie-break for `dominant`: on equal
/// scores the earlier label wins, which keeps the pick deterministic
/// instead of depending on map iteration order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Expression {
    Neutral,
    Happy,
    Surprise,
    Sad,
    Angry,
    Disgusted,
    Fearful,
    Contempt,
}

impl Expression {
    pub const ALL: [Expression; 8] = [
        Expression::Neutral,
        Expression::Happy,
        Expression::Surprise,
        Expression::Sad,
        Expression::Angry,
        Expression::Disgusted,
        Expression::Fearful,
        Expression::Contempt,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Expression::Neutral => "neutral",
            Expression::Happy => "happy",
            Expression::Surprise => "surprise",
            Expression::Sad => "sad",
            Expression::Angry => "angry",
            Expression::Disgusted => "disgusted",
            Expression::Fearful => "fearful",
            Expression::Contempt => "contempt",
        }
    }
}

/// Per-expression confidence scores in `[0, 1]`.
#[derive(Clone, Debug, PartialEq)]
pub struct ExpressionScores {
    scores: [f32; Expression::ALL.len()],
}

impl ExpressionScores {
    pub fn new(scores: [f32; Expression::ALL.len()]) -> Self {
        Self { scores }
    }

    /// Softmax over raw classifier outputs, shifted by the max logit for
    /// numerical stability.
    pub fn from_logits(logits: &[f32]) -> Self {
        debug_assert_eq!(logits.len(), Expression::ALL.len());
        let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        let mut scores = [0.0f32; Expression::ALL.len()];
        let mut sum = 0.0f32;
        for (i, &logit) in logits.iter().enumerate().take(scores.len()) {
            let e = (logit - max).exp();
            scores[i] = e;
            sum += e;
        }
        for s in &mut scores {
            *s /= sum;
        }
        Self { scores }
    }

    pub fn score(&self, expression: Expression) -> f32 {
        self.scores[expression as usize]
    }

    /// The highest-confidence expression. Strict comparison, so on equal
    /// scores the first label in `Expression::ALL` wins.
    pub fn dominant(&self) -> (Expression, f32) {
        let mut best = Expression::ALL[0];
        let mut best_score = self.scores[0];
        for (i, &expression) in Expression::ALL.iter().enumerate().skip(1) {
            if self.scores[i] > best_score {
                best = expression;
                best_score = self.scores[i];
            }
        }
        (best, best_score)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Expression, f32)> + '_ {
        Expression::ALL
            .iter()
            .zip(self.scores.iter())
            .map(|(&e, &s)| (e, s))
    }
}
