//! The individual cases of the battery
//!
//! Each case issues at most one request through [`ApiTester::run_check`],
//! performs its own bookkeeping on the session and returns whether the case
//! held. That can differ from the raw status match: a login answered with 200
//! but no token is a failed case.

use chrono::{Duration, Local};
use crate::api::payloads::{
    AdminStats, CreatedBet, CreatedGame, CreatedMatch, LoginRequest, LoginResponse, MatchResult,
    NewBet, NewGame, NewMatch, OddsUpdate, PlaceBetRequest, PlacedBet, Profile, RegisterRequest,
};
use crate::api::{decode, listing_len};
use crate::client::{ApiRequest, Method, Transport};
use crate::config::Credentials;
use super::report::Reporter;
use super::session::ResourceKind;
use super::tester::ApiTester;

pub const ADMIN_LOGIN: &str = "Admin Login";
pub const USER_LOGIN: &str = "User Login";
pub const USER_REGISTRATION: &str = "User Registration";
pub const UNAUTHORIZED_ACCESS: &str = "Unauthorized Admin Access";
pub const USER_ACCESS_TO_ADMIN: &str = "User Access to Admin";
pub const ADMIN_STATS: &str = "Admin Stats";
pub const CREATE_GAME: &str = "Create Game";
pub const GET_GAMES: &str = "Get Games";
pub const CREATE_MATCH: &str = "Create Match";
pub const GET_MATCHES: &str = "Get Matches";
pub const CREATE_BET: &str = "Create Bet";
pub const UPDATE_BET_ODDS: &str = "Update Bet Odds";
pub const GET_ALL_USERS: &str = "Get All Users";
pub const GET_USER_PROFILE: &str = "Get User Profile";
pub const GET_AVAILABLE_BETS: &str = "Get Available Bets";
pub const PLACE_USER_BET: &str = "Place User Bet";
pub const GET_USER_BET_HISTORY: &str = "Get User Bet History";
pub const SET_MATCH_RESULT: &str = "Set Match Result";
pub const VERIFY_SETTLED_BALANCE: &str = "Verify Settled Balance";

/// Odds the bet is created with
pub const INITIAL_ODDS: (f64, f64) = (1.8, 2.2);
/// Odds the bet is moved to before the user stakes on it
pub const UPDATED_ODDS: (f64, f64) = (2.0, 1.9);
/// Amount the user stakes, in écus
pub const STAKE_ECUS: f64 = 50.0;
/// Side the user backs and the match is resolved for
pub const WINNING_SIDE: &str = "team1";

impl<T: Transport, R: Reporter> ApiTester<T, R> {
    async fn login(&mut self, name: &str, creds: &Credentials) -> Option<LoginResponse> {
        let body = LoginRequest {
            email: creds.email.clone(),
            password: creds.password.clone(),
        };
        let outcome = self
            .run_json_check(name, ApiRequest::new(Method::Post, "auth/login"), &body, 200)
            .await;
        if !outcome.passed {
            return None;
        }

        match decode::<LoginResponse>(&outcome.payload) {
            Some(login) => Some(login),
            None => {
                self.fail_unmet(name, "Response carried no token");
                None
            }
        }
    }

    /// Log in as the seeded admin and keep the admin token
    pub async fn test_admin_login(&mut self, creds: &Credentials) -> bool {
        let Some(login) = self.login(ADMIN_LOGIN, creds).await else {
            return false;
        };

        let user = login.user.unwrap_or_default();
        self.detail(format!(
            "Admin user: {} (role: {})",
            user.username.as_deref().unwrap_or("unknown"),
            user.role.as_deref().unwrap_or("unknown"),
        ));
        self.session_mut().admin_token = Some(login.token);
        true
    }

    /// Log in as the seeded player and keep the user token
    pub async fn test_user_login(&mut self, creds: &Credentials) -> bool {
        let Some(login) = self.login(USER_LOGIN, creds).await else {
            return false;
        };

        let user = login.user.unwrap_or_default();
        self.detail(format!(
            "User: {} (balance: {} écus)",
            user.username.as_deref().unwrap_or("unknown"),
            user.balance_ecus.unwrap_or(0.0),
        ));
        self.session_mut().user_token = Some(login.token);
        true
    }

    /// Register a fresh account, suffixed with the current time of day
    pub async fn test_user_registration(&mut self) -> bool {
        let stamp = Local::now().format("%H%M%S").to_string();
        let body = RegisterRequest {
            username: format!("testuser_{}", stamp),
            email: format!("test_{}@example.com", stamp),
            password: "testpass123".to_string(),
        };

        self.run_json_check(USER_REGISTRATION, ApiRequest::new(Method::Post, "auth/register"), &body, 200)
            .await
            .passed
    }

    /// An admin-only endpoint must refuse a request without a token
    pub async fn test_unauthorized_access(&mut self) -> bool {
        self.run_check(UNAUTHORIZED_ACCESS, ApiRequest::new(Method::Get, "admin/stats"), 401)
            .await
            .passed
    }

    /// An admin-only endpoint must refuse a non-admin token
    pub async fn test_user_access_to_admin(&mut self) -> bool {
        let request = ApiRequest::new(Method::Get, "admin/stats")
            .with_token(self.session().user_token.as_deref());
        self.run_check(USER_ACCESS_TO_ADMIN, request, 403).await.passed
    }

    pub async fn test_admin_stats(&mut self) -> bool {
        let request = ApiRequest::new(Method::Get, "admin/stats")
            .with_token(self.session().admin_token.as_deref());
        let outcome = self.run_check(ADMIN_STATS, request, 200).await;
        if outcome.passed {
            let stats = decode::<AdminStats>(&outcome.payload).unwrap_or_default();
            self.detail(format!("Users: {}, Matches: {}", stats.total_users, stats.total_matches));
            self.detail(format!("Bets: {}, Écus: {}", stats.total_bets, stats.total_ecus_circulation));
        }
        outcome.passed
    }

    pub async fn test_create_game(&mut self) -> bool {
        let body = NewGame {
            name: "League of Legends Test".to_string(),
            game_type: "lol".to_string(),
            logo_url: "https://example.com/lol-logo.png".to_string(),
        };
        let request = ApiRequest::new(Method::Post, "admin/games")
            .with_token(self.session().admin_token.as_deref());
        let outcome = self.run_json_check(CREATE_GAME, request, &body, 200).await;

        if let Some(game) = decode::<CreatedGame>(&outcome.payload) {
            self.detail(format!("Created game: {} (ID: {})", game.name, game.id));
            self.session_mut().resources.push(ResourceKind::Games, game.id);
        }
        outcome.passed
    }

    pub async fn test_get_games(&mut self) -> bool {
        let request = ApiRequest::new(Method::Get, "admin/games")
            .with_token(self.session().admin_token.as_deref());
        let outcome = self.run_check(GET_GAMES, request, 200).await;
        if outcome.passed {
            self.detail(format!("Found {} games", listing_len(&outcome.payload)));
        }
        outcome.passed
    }

    /// Schedule a match for tomorrow under the first created game
    pub async fn test_create_match(&mut self) -> bool {
        let Some(game_id) = self.session().resources.first(ResourceKind::Games).cloned() else {
            return self.fail_missing_dependency(CREATE_MATCH, ResourceKind::Games);
        };

        let match_date = (Local::now() + Duration::days(1))
            .naive_local()
            .format("%Y-%m-%dT%H:%M:%S%.6f")
            .to_string();
        let body = NewMatch {
            game_id,
            team1_name: "Team Alpha".to_string(),
            team2_name: "Team Beta".to_string(),
            match_date,
        };
        let request = ApiRequest::new(Method::Post, "admin/matches")
            .with_token(self.session().admin_token.as_deref());
        let outcome = self.run_json_check(CREATE_MATCH, request, &body, 200).await;

        if let Some(created) = decode::<CreatedMatch>(&outcome.payload) {
            self.detail(format!("Created match: {} vs {}", created.team1_name, created.team2_name));
            self.session_mut().resources.push(ResourceKind::Matches, created.id);
        }
        outcome.passed
    }

    pub async fn test_get_matches(&mut self) -> bool {
        let outcome = self.run_check(GET_MATCHES, ApiRequest::new(Method::Get, "matches"), 200).await;
        if outcome.passed {
            self.detail(format!("Found {} matches", listing_len(&outcome.payload)));
        }
        outcome.passed
    }

    /// Open a bet on the first created match
    pub async fn test_create_bet(&mut self) -> bool {
        let Some(match_id) = self.session().resources.first(ResourceKind::Matches).cloned() else {
            return self.fail_missing_dependency(CREATE_BET, ResourceKind::Matches);
        };

        let body = NewBet {
            match_id,
            odds_team1: INITIAL_ODDS.0,
            odds_team2: INITIAL_ODDS.1,
        };
        let request = ApiRequest::new(Method::Post, "admin/bets")
            .with_token(self.session().admin_token.as_deref());
        let outcome = self.run_json_check(CREATE_BET, request, &body, 200).await;

        if let Some(bet) = decode::<CreatedBet>(&outcome.payload) {
            self.detail(format!("Created bet with odds {} / {}", bet.odds_team1, bet.odds_team2));
            self.session_mut().resources.push(ResourceKind::Bets, bet.id);
        }
        outcome.passed
    }

    pub async fn test_update_bet_odds(&mut self) -> bool {
        let Some(bet_id) = self.session().resources.first(ResourceKind::Bets).cloned() else {
            return self.fail_missing_dependency(UPDATE_BET_ODDS, ResourceKind::Bets);
        };

        let body = OddsUpdate {
            odds_team1: UPDATED_ODDS.0,
            odds_team2: UPDATED_ODDS.1,
        };
        let request = ApiRequest::new(Method::Patch, format!("admin/bets/{}/odds", bet_id))
            .with_token(self.session().admin_token.as_deref());
        self.run_json_check(UPDATE_BET_ODDS, request, &body, 200).await.passed
    }

    pub async fn test_admin_users(&mut self) -> bool {
        let request = ApiRequest::new(Method::Get, "admin/users")
            .with_token(self.session().admin_token.as_deref());
        let outcome = self.run_check(GET_ALL_USERS, request, 200).await;
        if outcome.passed {
            self.detail(format!("Found {} total users", listing_len(&outcome.payload)));
        }
        outcome.passed
    }

    async fn fetch_profile(&mut self, name: &str) -> Option<Profile> {
        let request = ApiRequest::new(Method::Get, "user/profile")
            .with_token(self.session().user_token.as_deref());
        let outcome = self.run_check(name, request, 200).await;
        if !outcome.passed {
            return None;
        }
        Some(decode::<Profile>(&outcome.payload).unwrap_or_default())
    }

    /// Read the user's profile; before a stake is placed the balance is remembered
    pub async fn test_user_profile(&mut self) -> bool {
        let Some(profile) = self.fetch_profile(GET_USER_PROFILE).await else {
            return false;
        };

        self.detail(format!("User balance: {} écus", profile.balance_ecus.unwrap_or(0.0)));
        let session = self.session_mut();
        if session.balance.stake.is_none() {
            if let Some(balance) = profile.balance_ecus {
                session.balance.before_stake = Some(balance);
            }
        }
        true
    }

    pub async fn test_get_bets(&mut self) -> bool {
        let outcome = self.run_check(GET_AVAILABLE_BETS, ApiRequest::new(Method::Get, "bets"), 200).await;
        if outcome.passed {
            self.detail(format!("Found {} available bets", listing_len(&outcome.payload)));
        }
        outcome.passed
    }

    /// Stake on the first created bet as the user
    pub async fn test_place_bet(&mut self) -> bool {
        let Some(bet_id) = self.session().resources.first(ResourceKind::Bets).cloned() else {
            return self.fail_missing_dependency(PLACE_USER_BET, ResourceKind::Bets);
        };

        let body = PlaceBetRequest {
            team_selected: WINNING_SIDE.to_string(),
            amount_ecus: STAKE_ECUS,
        };
        let request = ApiRequest::new(Method::Post, format!("bets/{}/place", bet_id))
            .with_token(self.session().user_token.as_deref());
        let outcome = self.run_json_check(PLACE_USER_BET, request, &body, 200).await;

        if let Some(placed) = decode::<PlacedBet>(&outcome.payload) {
            self.detail(format!("Placed bet: {} écus on {}", body.amount_ecus, body.team_selected));
            self.detail(format!("Potential win: {} écus", placed.user_bet.potential_win));
            let session = self.session_mut();
            session.resources.push(ResourceKind::UserBets, placed.user_bet.id);
            session.balance.stake = Some(body.amount_ecus);
        }
        outcome.passed
    }

    pub async fn test_user_bet_history(&mut self) -> bool {
        let request = ApiRequest::new(Method::Get, "user/bets")
            .with_token(self.session().user_token.as_deref());
        let outcome = self.run_check(GET_USER_BET_HISTORY, request, 200).await;
        if outcome.passed {
            self.detail(format!("Found {} user bets", listing_len(&outcome.payload)));
        }
        outcome.passed
    }

    /// Resolve the first created match for the side the user backed
    pub async fn test_set_match_result(&mut self) -> bool {
        let Some(match_id) = self.session().resources.first(ResourceKind::Matches).cloned() else {
            return self.fail_missing_dependency(SET_MATCH_RESULT, ResourceKind::Matches);
        };

        let body = MatchResult {
            winner: WINNING_SIDE.to_string(),
        };
        let request = ApiRequest::new(Method::Patch, format!("admin/matches/{}/result", match_id))
            .with_token(self.session().admin_token.as_deref());
        let outcome = self.run_json_check(SET_MATCH_RESULT, request, &body, 200).await;
        if outcome.passed {
            self.detail(format!("Match result set: {} wins", body.winner));
        }
        outcome.passed
    }

    /// Re-read the profile after settlement.
    ///
    /// When both the pre-stake balance and the stake are known, the new
    /// balance must be above `before - stake`, i.e. the win was credited.
    pub async fn test_settled_balance(&mut self) -> bool {
        let Some(profile) = self.fetch_profile(VERIFY_SETTLED_BALANCE).await else {
            return false;
        };

        let floor = self.session().balance.post_stake_balance();
        match (profile.balance_ecus, floor) {
            (Some(balance), Some(floor)) if balance > floor => {
                self.detail(format!(
                    "User balance: {} écus (was {} écus after staking)",
                    balance, floor
                ));
                true
            }
            (Some(balance), Some(floor)) => self.fail_unmet(
                VERIFY_SETTLED_BALANCE,
                format!("Balance {} écus shows no winnings over {} écus", balance, floor),
            ),
            (None, Some(_)) => self.fail_unmet(VERIFY_SETTLED_BALANCE, "Profile carried no balance_ecus"),
            (balance, None) => {
                self.detail(format!("User balance: {} écus", balance.unwrap_or(0.0)));
                true
            }
        }
    }
}
