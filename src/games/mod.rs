//! Arcade game settlement
//!
//! The mini-games whose outcome is a single uniform roll settle here:
//! each kind carries an entry cost, the win probability of its decisive
//! roll and a payout multiplier. The roll is pure given the RNG, so
//! settlement is deterministic under a seeded generator in tests.
//! Wallet gating (logged-in, sufficient balance) happens before any
//! roll.
//!
//! The interactive games (blackjack hit/stand, the bingo card, the
//! hold-timer, the quiz) resolve on player input rather than one roll;
//! they share the same debit/credit wallet path but have no entry in
//! the settlement table.

use crate::error::Result;
use crate::session::{Session, SessionManager, SessionStorage};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::info;

/// The single-roll chance games hosted by the arcade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameKind {
    /// Classic fifty-fifty, heads or tails
    CoinToss,
    /// Guess whether Bitcoin's price rises or falls
    CryptoFlip,
    /// Roll a 6 to win the pot
    CryptoLudo,
    /// Roll a 4 or higher to win
    RippleDice,
    /// Snake length 5-24, above 15 wins
    EtherSnake,
    /// Your car against four rivals
    CryptoRacers,
    /// Higher random hand wins, ties lose
    BitcoinPoker,
    /// Same showdown with hole cards
    CryptoHoldem,
    /// Red or black on a 37-pocket wheel, green zero loses both
    DogeRoulette,
    /// Three matching symbols out of six pay the jackpot
    ShibaSlots,
    /// Long or short against a coin-flip market
    FuturesTradingSim,
    /// Guess whether the next block's fee comes in high or low
    GasFeeGamble,
    /// Three-in-ten launches reach the moon
    ToTheMoonRocket,
    /// Higher attack roll out of 100 wins, ties lose
    ChainlinkChampions,
}

impl GameKind {
    /// Entry cost deducted from the wallet before the roll
    pub fn entry_cost(&self) -> f64 {
        match self {
            GameKind::CryptoLudo | GameKind::ShibaSlots => 5.0,
            GameKind::CoinToss
            | GameKind::CryptoFlip
            | GameKind::RippleDice
            | GameKind::EtherSnake
            | GameKind::CryptoRacers
            | GameKind::DogeRoulette
            | GameKind::GasFeeGamble
            | GameKind::ChainlinkChampions => 10.0,
            GameKind::BitcoinPoker | GameKind::CryptoHoldem | GameKind::ToTheMoonRocket => 20.0,
            GameKind::FuturesTradingSim => 25.0,
        }
    }

    /// Probability the player wins the decisive roll
    pub fn win_probability(&self) -> f64 {
        match self {
            GameKind::CoinToss
            | GameKind::CryptoFlip
            | GameKind::RippleDice
            | GameKind::FuturesTradingSim
            | GameKind::GasFeeGamble => 0.5,
            GameKind::CryptoLudo => 1.0 / 6.0,
            // 9 of the 20 possible snake lengths clear the bar
            GameKind::EtherSnake => 0.45,
            // One of five cars
            GameKind::CryptoRacers => 0.2,
            // Strictly better of two uniform 10-rank hands; ties lose
            GameKind::BitcoinPoker | GameKind::CryptoHoldem => 0.45,
            // 18 winning pockets of 37
            GameKind::DogeRoulette => 18.0 / 37.0,
            // Three independent picks from six symbols line up
            GameKind::ShibaSlots => 1.0 / 36.0,
            GameKind::ToTheMoonRocket => 0.3,
            // Strictly higher of two uniform rolls in 1..=100
            GameKind::ChainlinkChampions => 0.495,
        }
    }

    /// Payout as a multiple of the entry cost on a win
    pub fn payout_multiplier(&self) -> f64 {
        match self {
            GameKind::CoinToss
            | GameKind::CryptoFlip
            | GameKind::RippleDice
            | GameKind::FuturesTradingSim
            | GameKind::GasFeeGamble
            | GameKind::ChainlinkChampions => 1.9,
            GameKind::CryptoLudo => 5.5,
            GameKind::EtherSnake | GameKind::BitcoinPoker | GameKind::CryptoHoldem => 2.0,
            GameKind::CryptoRacers => 4.5,
            GameKind::DogeRoulette => 2.0,
            GameKind::ShibaSlots => 30.0,
            GameKind::ToTheMoonRocket => 3.0,
        }
    }

    /// All kinds, in display order
    pub fn all() -> &'static [GameKind] {
        &[
            GameKind::CoinToss,
            GameKind::CryptoFlip,
            GameKind::CryptoLudo,
            GameKind::RippleDice,
            GameKind::EtherSnake,
            GameKind::CryptoRacers,
            GameKind::BitcoinPoker,
            GameKind::CryptoHoldem,
            GameKind::DogeRoulette,
            GameKind::ShibaSlots,
            GameKind::FuturesTradingSim,
            GameKind::GasFeeGamble,
            GameKind::ToTheMoonRocket,
            GameKind::ChainlinkChampions,
        ]
    }
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GameKind::CoinToss => "Coin Toss",
            GameKind::CryptoFlip => "Crypto Flip",
            GameKind::CryptoLudo => "Crypto Ludo",
            GameKind::RippleDice => "Ripple Dice",
            GameKind::EtherSnake => "Ether Snake",
            GameKind::CryptoRacers => "Crypto Racers",
            GameKind::BitcoinPoker => "Bitcoin Poker",
            GameKind::CryptoHoldem => "Crypto Hold'em",
            GameKind::DogeRoulette => "Doge Roulette",
            GameKind::ShibaSlots => "Shiba Slots",
            GameKind::FuturesTradingSim => "Futures Trading Sim",
            GameKind::GasFeeGamble => "Gas Fee Gamble",
            GameKind::ToTheMoonRocket => "To The Moon Rocket",
            GameKind::ChainlinkChampions => "Chainlink Champions",
        };
        write!(f, "{name}")
    }
}

/// Result of one settled round
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GameOutcome {
    pub won: bool,
    /// Amount credited back to the wallet (0 on a loss)
    pub payout: f64,
    /// Wallet balance after settlement
    pub balance_after: f64,
}

/// Roll one round. Pure given the RNG; no wallet involvement.
pub fn roll<R: Rng>(kind: GameKind, rng: &mut R) -> bool {
    rng.gen::<f64>() < kind.win_probability()
}

/// Debit the entry cost, roll, and credit any payout.
///
/// The debit happens first and sticks on a loss; a logged-out or
/// underfunded session is rejected before the roll.
pub fn play<S: SessionStorage, R: Rng>(
    sessions: &SessionManager<S>,
    kind: GameKind,
    rng: &mut R,
) -> Result<GameOutcome> {
    let cost = kind.entry_cost();
    let session = sessions.debit(cost)?;

    let won = roll(kind, rng);
    let (payout, balance_after) = if won {
        let payout = cost * kind.payout_multiplier();
        let session = sessions.credit(payout)?;
        (payout, session.wallet_balance)
    } else {
        (0.0, session.wallet_balance)
    };

    info!(
        "{} settled: won={} payout={:.2} balance={:.2}",
        kind, won, payout, balance_after
    );
    Ok(GameOutcome {
        won,
        payout,
        balance_after,
    })
}

/// Balance check used by the payment modal before offering a round
pub fn can_afford(session: &Session, kind: GameKind) -> bool {
    session.wallet_balance >= kind.entry_cost()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SessionConfig;
    use crate::error::ArcadeError;
    use crate::session::MemoryStorage;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn manager(initial_balance: f64) -> SessionManager<MemoryStorage> {
        SessionManager::new(
            MemoryStorage::new(),
            SessionConfig {
                initial_balance,
                max_top_up: 10_000.0,
            },
        )
    }

    #[test]
    fn roll_is_deterministic_under_seed() {
        let mut a = StdRng::seed_from_u64(7);
        let mut b = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            assert_eq!(
                roll(GameKind::CoinToss, &mut a),
                roll(GameKind::CoinToss, &mut b)
            );
        }
    }

    #[test]
    fn play_requires_login() {
        let m = manager(1000.0);
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(
            play(&m, GameKind::CoinToss, &mut rng).unwrap_err(),
            ArcadeError::NotLoggedIn
        ));
    }

    #[test]
    fn play_rejects_underfunded_wallet_before_rolling() {
        let m = manager(5.0);
        m.login("Ada", "ada@example.com").unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let err = play(&m, GameKind::CoinToss, &mut rng).unwrap_err();
        assert!(matches!(err, ArcadeError::InsufficientBalance { .. }));
        // Nothing was deducted
        assert_eq!(m.current().unwrap().unwrap().wallet_balance, 5.0);
    }

    #[test]
    fn loss_keeps_the_stake_win_credits_the_payout() {
        let m = manager(1000.0);
        m.login("Ada", "ada@example.com").unwrap();

        let mut rng = StdRng::seed_from_u64(42);
        let cost = GameKind::CoinToss.entry_cost();
        let outcome = play(&m, GameKind::CoinToss, &mut rng).unwrap();

        let expected = if outcome.won {
            1000.0 - cost + cost * GameKind::CoinToss.payout_multiplier()
        } else {
            1000.0 - cost
        };
        assert!((outcome.balance_after - expected).abs() < 1e-9);
        assert_eq!(
            m.current().unwrap().unwrap().wallet_balance,
            outcome.balance_after
        );
    }

    #[test]
    fn every_game_pays_more_than_even_on_a_win() {
        for &kind in GameKind::all() {
            assert!(kind.entry_cost() > 0.0);
            assert!(kind.payout_multiplier() > 1.0);
            assert!((0.0..=1.0).contains(&kind.win_probability()));
        }
    }

    #[test]
    fn long_shot_games_pay_longer_odds() {
        // Payouts track the decisive roll: rarer wins pay more
        assert!(
            GameKind::ShibaSlots.payout_multiplier() > GameKind::CryptoLudo.payout_multiplier()
        );
        assert!(
            GameKind::CryptoLudo.payout_multiplier() > GameKind::CoinToss.payout_multiplier()
        );
        assert!(GameKind::ShibaSlots.win_probability() < GameKind::CryptoLudo.win_probability());
    }

    #[test]
    fn can_afford_matches_entry_cost() {
        let m = manager(10.0);
        let session = m.login("Ada", "ada@example.com").unwrap();
        assert!(can_afford(&session, GameKind::CoinToss));
        assert!(!can_afford(&session, GameKind::FuturesTradingSim));
    }
}
