/// When an evolution run should stop, derived from the generation limit
/// (NGEN) and the improvement patience (PATIENCE). Zero disables a limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoppingRule {
    GenerationsAndPatience { generations: usize, patience: usize },
    GenerationsOnly { generations: usize },
    PatienceOnly { patience: usize },
    Unlimited,
}

impl StoppingRule {
    pub fn new(generations: usize, patience: usize) -> Self {
        match (generations, patience) {
            (0, 0) => StoppingRule::Unlimited,
            (generations, 0) => StoppingRule::GenerationsOnly { generations },
            (0, patience) => StoppingRule::PatienceOnly { patience },
            (generations, patience) => StoppingRule::GenerationsAndPatience {
                generations,
                patience,
            },
        }
    }

    pub fn mode_message(&self) -> &'static str {
        match self {
            StoppingRule::GenerationsAndPatience { .. } => {
                "Mode: Generation and improvement limitations are both active.\n"
            }
            StoppingRule::GenerationsOnly { .. } => "Mode: Only generation limitation is active.\n",
            StoppingRule::PatienceOnly { .. } => "Mode: Only improvement limitation is active.\n",
            StoppingRule::Unlimited => "Mode: No limitation is active -> please set one.\n",
        }
    }

    /// Whether the run may evolve `generation`, given the generation at which
    /// the best fitness last improved. An unlimited rule never continues, so a
    /// run without any limit configured does not start.
    pub fn should_continue(&self, generation: usize, last_improvement_at: usize) -> bool {
        match *self {
            StoppingRule::GenerationsAndPatience {
                generations,
                patience,
            } => {
                let within_generations = within_generation_limit(generation, generations);
                let within_patience = within_patience(generation, last_improvement_at, patience);
                within_generations && within_patience
            }
            StoppingRule::GenerationsOnly { generations } => {
                within_generation_limit(generation, generations)
            }
            StoppingRule::PatienceOnly { patience } => {
                within_patience(generation, last_improvement_at, patience)
            }
            StoppingRule::Unlimited => false,
        }
    }
}

fn within_generation_limit(generation: usize, generations: usize) -> bool {
    let within = generation <= generations;
    if !within {
        log::info!("Reached generation limitation of {}.", generations);
    }
    within
}

fn within_patience(generation: usize, last_improvement_at: usize, patience: usize) -> bool {
    let within = generation.saturating_sub(last_improvement_at) <= patience;
    if !within {
        log::info!("Reached improvement limitation of {}.", patience);
    }
    within
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_selection() {
        assert_eq!(StoppingRule::new(0, 0), StoppingRule::Unlimited);
        assert_eq!(
            StoppingRule::new(10, 0),
            StoppingRule::GenerationsOnly { generations: 10 }
        );
        assert_eq!(
            StoppingRule::new(0, 10),
            StoppingRule::PatienceOnly { patience: 10 }
        );
        assert_eq!(
            StoppingRule::new(10, 5),
            StoppingRule::GenerationsAndPatience {
                generations: 10,
                patience: 5
            }
        );
    }

    #[test]
    fn test_mode_messages() {
        assert_eq!(
            StoppingRule::new(0, 0).mode_message(),
            "Mode: No limitation is active -> please set one.\n"
        );
        assert_eq!(
            StoppingRule::new(10, 0).mode_message(),
            "Mode: Only generation limitation is active.\n"
        );
        assert_eq!(
            StoppingRule::new(0, 10).mode_message(),
            "Mode: Only improvement limitation is active.\n"
        );
        assert_eq!(
            StoppingRule::new(10, 10).mode_message(),
            "Mode: Generation and improvement limitations are both active.\n"
        );
    }

    #[test]
    fn test_generation_limit_is_inclusive() {
        let rule = StoppingRule::new(10, 0);
        assert!(rule.should_continue(10, 0));
        assert!(!rule.should_continue(11, 0));
    }

    #[test]
    fn test_patience_window() {
        let rule = StoppingRule::new(0, 3);
        assert!(rule.should_continue(7, 4));
        assert!(!rule.should_continue(8, 4));
    }

    #[test]
    fn test_both_limits_must_hold() {
        let rule = StoppingRule::new(10, 3);
        assert!(rule.should_continue(5, 4));
        assert!(!rule.should_continue(9, 4));
        assert!(!rule.should_continue(11, 11));
    }

    #[test]
    fn test_unlimited_never_continues() {
        assert!(!StoppingRule::Unlimited.should_continue(0, 0));
    }
}
