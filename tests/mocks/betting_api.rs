//! In-memory stand-in for the ShiiruMax betting service

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use async_trait::async_trait;
use serde_json::{json, Value};
use shiirumax_probe::{ApiRequest, ApiResponse, Method, Transport, TransportError};

pub const ADMIN_EMAIL: &str = "admin@shiirumax.com";
pub const ADMIN_PASSWORD: &str = "admin123";
pub const PLAYER_EMAIL: &str = "player1@test.com";
pub const PLAYER_PASSWORD: &str = "test123";
pub const PLAYER_START_BALANCE: f64 = 1000.0;

#[derive(Debug, Clone)]
struct MockUser {
    id: String,
    username: String,
    email: String,
    password: String,
    role: &'static str,
    balance: f64,
}

impl MockUser {
    fn to_json(&self) -> Value {
        json!({
            "id": self.id,
            "username": self.username,
            "email": self.email,
            "role": self.role,
            "balance_ecus": self.balance,
        })
    }
}

#[derive(Debug, Clone)]
struct MockMatch {
    id: String,
    game_id: String,
    team1_name: String,
    team2_name: String,
    winner: Option<String>,
}

#[derive(Debug, Clone)]
struct MockBet {
    id: String,
    match_id: String,
    odds_team1: f64,
    odds_team2: f64,
}

#[derive(Debug, Clone)]
struct MockUserBet {
    id: u64,
    bet_id: String,
    user_id: String,
    team_selected: String,
    amount: f64,
    potential_win: f64,
    settled: bool,
}

/// Knobs for making the mock misbehave
#[derive(Debug, Clone, Default)]
pub struct MockFaults {
    /// Force a status for every request whose `METHOD path` starts with the key
    pub forced_status: HashMap<String, u16>,
    /// Answer logins with 200 but leave out the token
    pub login_without_token: bool,
    /// Settle matches without paying winners
    pub withhold_payouts: bool,
    /// Fail every request at the transport level
    pub offline: bool,
}

#[derive(Debug, Default)]
struct MockState {
    users: Vec<MockUser>,
    tokens: HashMap<String, String>,
    games: Vec<Value>,
    matches: Vec<MockMatch>,
    bets: Vec<MockBet>,
    user_bets: Vec<MockUserBet>,
    next_id: u64,
}

impl MockState {
    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{}-{}", prefix, self.next_id)
    }
}

/// Mock betting API that implements [`Transport`] directly
#[derive(Debug, Clone)]
pub struct MockBettingApi {
    state: Arc<Mutex<MockState>>,
    requests: Arc<Mutex<Vec<ApiRequest>>>,
    faults: Arc<Mutex<MockFaults>>,
}

impl MockBettingApi {
    /// Create a mock seeded with the admin and player accounts
    pub fn seeded() -> Self {
        let mut state = MockState::default();
        state.users.push(MockUser {
            id: "user-admin".to_string(),
            username: "admin".to_string(),
            email: ADMIN_EMAIL.to_string(),
            password: ADMIN_PASSWORD.to_string(),
            role: "admin",
            balance: 0.0,
        });
        state.users.push(MockUser {
            id: "user-player1".to_string(),
            username: "player1".to_string(),
            email: PLAYER_EMAIL.to_string(),
            password: PLAYER_PASSWORD.to_string(),
            role: "user",
            balance: PLAYER_START_BALANCE,
        });

        Self {
            state: Arc::new(Mutex::new(state)),
            requests: Arc::new(Mutex::new(Vec::new())),
            faults: Arc::new(Mutex::new(MockFaults::default())),
        }
    }

    pub fn with_faults(self, faults: MockFaults) -> Self {
        *self.faults.lock().unwrap() = faults;
        self
    }

    /// Force `status` for requests matching `"METHOD path-prefix"`
    pub fn force_status(self, route: &str, status: u16) -> Self {
        self.faults.lock().unwrap().forced_status.insert(route.to_string(), status);
        self
    }

    /// Every request received, in order
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Requests whose path starts with `prefix`
    pub fn requests_to(&self, method: Method, prefix: &str) -> Vec<ApiRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.path.starts_with(prefix))
            .collect()
    }

    pub fn balance_of(&self, email: &str) -> Option<f64> {
        let state = self.state.lock().unwrap();
        state.users.iter().find(|u| u.email == email).map(|u| u.balance)
    }

    pub fn bet_odds(&self, bet_id: &str) -> Option<(f64, f64)> {
        let state = self.state.lock().unwrap();
        state
            .bets
            .iter()
            .find(|b| b.id == bet_id)
            .map(|b| (b.odds_team1, b.odds_team2))
    }

    fn forced_status(&self, request: &ApiRequest) -> Option<u16> {
        let route = format!("{} {}", request.method, request.path);
        let faults = self.faults.lock().unwrap();
        faults
            .forced_status
            .iter()
            .find(|(prefix, _)| route.starts_with(prefix.as_str()))
            .map(|(_, status)| *status)
    }

    fn handle(&self, request: &ApiRequest) -> ApiResponse {
        if let Some(status) = self.forced_status(request) {
            return reply(status, json!({"detail": "forced by test"}));
        }

        let faults = self.faults.lock().unwrap().clone();
        let mut state = self.state.lock().unwrap();
        let body = request.body.clone().unwrap_or(Value::Null);
        let segments: Vec<&str> = request.path.split('/').collect();

        match (request.method, segments.as_slice()) {
            (Method::Post, ["auth", "login"]) => login(&mut state, &body, faults.login_without_token),
            (Method::Post, ["auth", "register"]) => register(&mut state, &body),
            (Method::Get, ["matches"]) => {
                let list: Vec<Value> = state.matches.iter().map(match_json).collect();
                reply(200, Value::Array(list))
            }
            (Method::Get, ["bets"]) => {
                let list: Vec<Value> = state.bets.iter().map(bet_json).collect();
                reply(200, Value::Array(list))
            }
            (_, ["admin", ..]) => match authenticate(&state, request, true) {
                Err(response) => response,
                Ok(_) => admin_route(&mut state, request.method, &segments[1..], &body, faults.withhold_payouts),
            },
            (_, ["user", ..]) | (_, ["bets", _, "place"]) => match authenticate(&state, request, false) {
                Err(response) => response,
                Ok(user_id) => user_route(&mut state, request.method, &segments, &body, &user_id),
            },
            _ => reply(404, json!({"detail": "Not Found"})),
        }
    }
}

#[async_trait]
impl Transport for MockBettingApi {
    async fn send(&self, _base_url: &str, request: &ApiRequest) -> Result<ApiResponse, TransportError> {
        self.requests.lock().unwrap().push(request.clone());

        if self.faults.lock().unwrap().offline {
            return Err(TransportError::ConnectionFailed {
                message: "mock service offline".to_string(),
            });
        }

        Ok(self.handle(request))
    }
}

fn reply(status: u16, body: Value) -> ApiResponse {
    ApiResponse::new(status, body.to_string())
}

fn match_json(m: &MockMatch) -> Value {
    json!({
        "id": m.id,
        "game_id": m.game_id,
        "team1_name": m.team1_name,
        "team2_name": m.team2_name,
        "winner": m.winner,
    })
}

fn bet_json(b: &MockBet) -> Value {
    json!({
        "id": b.id,
        "match_id": b.match_id,
        "odds_team1": b.odds_team1,
        "odds_team2": b.odds_team2,
    })
}

fn user_bet_json(ub: &MockUserBet) -> Value {
    json!({
        "id": ub.id,
        "bet_id": ub.bet_id,
        "team_selected": ub.team_selected,
        "amount_ecus": ub.amount,
        "potential_win": ub.potential_win,
        "settled": ub.settled,
    })
}

fn login(state: &mut MockState, body: &Value, without_token: bool) -> ApiResponse {
    let email = body["email"].as_str().unwrap_or_default();
    let password = body["password"].as_str().unwrap_or_default();

    let Some(user) = state.users.iter().find(|u| u.email == email && u.password == password).cloned() else {
        return reply(401, json!({"detail": "Invalid credentials"}));
    };

    if without_token {
        return reply(200, json!({"user": user.to_json()}));
    }

    let token = format!("token-{}-{}", user.id, state.tokens.len());
    state.tokens.insert(token.clone(), user.id.clone());
    reply(200, json!({"token": token, "user": user.to_json()}))
}

fn register(state: &mut MockState, body: &Value) -> ApiResponse {
    let username = body["username"].as_str().unwrap_or_default().to_string();
    let email = body["email"].as_str().unwrap_or_default().to_string();
    let password = body["password"].as_str().unwrap_or_default().to_string();

    if username.is_empty() || email.is_empty() || password.is_empty() {
        return reply(422, json!({"detail": "Missing fields"}));
    }
    if state.users.iter().any(|u| u.email == email || u.username == username) {
        return reply(400, json!({"detail": "User already exists"}));
    }

    let id = state.next_id("user");
    let user = MockUser {
        id: id.clone(),
        username,
        email,
        password,
        role: "user",
        balance: PLAYER_START_BALANCE,
    };
    let token = format!("token-{}", id);
    state.tokens.insert(token.clone(), id);
    let user_json = user.to_json();
    state.users.push(user);
    reply(200, json!({"token": token, "user": user_json}))
}

fn authenticate(state: &MockState, request: &ApiRequest, admin_only: bool) -> Result<String, ApiResponse> {
    let Some(token) = &request.token else {
        return Err(reply(401, json!({"detail": "Not authenticated"})));
    };
    let Some(user_id) = state.tokens.get(token) else {
        return Err(reply(401, json!({"detail": "Invalid token"})));
    };
    let is_admin = state.users.iter().any(|u| &u.id == user_id && u.role == "admin");
    if admin_only && !is_admin {
        return Err(reply(403, json!({"detail": "Admin access required"})));
    }
    Ok(user_id.clone())
}

fn admin_route(state: &mut MockState, method: Method, rest: &[&str], body: &Value, withhold_payouts: bool) -> ApiResponse {
    match (method, rest) {
        (Method::Get, ["stats"]) => {
            let circulation: f64 = state.users.iter().map(|u| u.balance).sum();
            reply(200, json!({
                "total_users": state.users.len(),
                "total_matches": state.matches.len(),
                "total_bets": state.user_bets.len(),
                "total_ecus_circulation": circulation,
            }))
        }
        (Method::Get, ["users"]) => {
            let list: Vec<Value> = state.users.iter().map(MockUser::to_json).collect();
            reply(200, Value::Array(list))
        }
        (Method::Post, ["games"]) => {
            let id = state.next_id("game");
            let game = json!({
                "id": id,
                "name": body["name"],
                "type": body["type"],
                "logo_url": body["logo_url"],
            });
            state.games.push(game.clone());
            reply(200, game)
        }
        (Method::Get, ["games"]) => reply(200, Value::Array(state.games.clone())),
        (Method::Post, ["matches"]) => {
            let game_id = body["game_id"].as_str().unwrap_or_default().to_string();
            if !state.games.iter().any(|g| g["id"] == game_id.as_str()) {
                return reply(404, json!({"detail": "Game not found"}));
            }
            let id = state.next_id("match");
            let created = MockMatch {
                id,
                game_id,
                team1_name: body["team1_name"].as_str().unwrap_or_default().to_string(),
                team2_name: body["team2_name"].as_str().unwrap_or_default().to_string(),
                winner: None,
            };
            let response = match_json(&created);
            state.matches.push(created);
            reply(200, response)
        }
        (Method::Patch, ["matches", match_id, "result"]) => {
            let winner = body["winner"].as_str().unwrap_or_default().to_string();
            let Some(found) = state.matches.iter_mut().find(|m| m.id == *match_id) else {
                return reply(404, json!({"detail": "Match not found"}));
            };
            found.winner = Some(winner.clone());

            let bet_ids: Vec<String> = state
                .bets
                .iter()
                .filter(|b| b.match_id == *match_id)
                .map(|b| b.id.clone())
                .collect();
            let mut payouts: Vec<(String, f64)> = Vec::new();
            for ub in state.user_bets.iter_mut().filter(|ub| bet_ids.contains(&ub.bet_id) && !ub.settled) {
                ub.settled = true;
                if ub.team_selected == winner && !withhold_payouts {
                    payouts.push((ub.user_id.clone(), ub.potential_win));
                }
            }
            for (user_id, amount) in payouts {
                if let Some(user) = state.users.iter_mut().find(|u| u.id == user_id) {
                    user.balance += amount;
                }
            }
            reply(200, json!({"message": "Match result set and winnings processed"}))
        }
        (Method::Post, ["bets"]) => {
            let match_id = body["match_id"].as_str().unwrap_or_default().to_string();
            if !state.matches.iter().any(|m| m.id == match_id) {
                return reply(404, json!({"detail": "Match not found"}));
            }
            let id = state.next_id("bet");
            let bet = MockBet {
                id,
                match_id,
                odds_team1: body["odds_team1"].as_f64().unwrap_or(1.0),
                odds_team2: body["odds_team2"].as_f64().unwrap_or(1.0),
            };
            let response = bet_json(&bet);
            state.bets.push(bet);
            reply(200, response)
        }
        (Method::Patch, ["bets", bet_id, "odds"]) => {
            let Some(bet) = state.bets.iter_mut().find(|b| b.id == *bet_id) else {
                return reply(404, json!({"detail": "Bet not found"}));
            };
            bet.odds_team1 = body["odds_team1"].as_f64().unwrap_or(bet.odds_team1);
            bet.odds_team2 = body["odds_team2"].as_f64().unwrap_or(bet.odds_team2);
            reply(200, json!({"message": "Odds updated"}))
        }
        _ => reply(404, json!({"detail": "Not Found"})),
    }
}

fn user_route(state: &mut MockState, method: Method, segments: &[&str], body: &Value, user_id: &str) -> ApiResponse {
    match (method, segments) {
        (Method::Get, ["user", "profile"]) => match state.users.iter().find(|u| u.id == user_id) {
            Some(user) => reply(200, user.to_json()),
            None => reply(404, json!({"detail": "User not found"})),
        },
        (Method::Get, ["user", "bets"]) => {
            let list: Vec<Value> = state
                .user_bets
                .iter()
                .filter(|ub| ub.user_id == user_id)
                .map(user_bet_json)
                .collect();
            reply(200, Value::Array(list))
        }
        (Method::Post, ["bets", bet_id, "place"]) => {
            let Some(bet) = state.bets.iter().find(|b| b.id == *bet_id).cloned() else {
                return reply(404, json!({"detail": "Bet not found"}));
            };
            let team = body["team_selected"].as_str().unwrap_or_default().to_string();
            let amount = body["amount_ecus"].as_f64().unwrap_or(0.0);
            let odds = match team.as_str() {
                "team1" => bet.odds_team1,
                "team2" => bet.odds_team2,
                _ => return reply(422, json!({"detail": "Invalid team"})),
            };

            let Some(user) = state.users.iter_mut().find(|u| u.id == user_id) else {
                return reply(404, json!({"detail": "User not found"}));
            };
            if amount <= 0.0 || amount > user.balance {
                return reply(400, json!({"detail": "Insufficient balance"}));
            }
            user.balance -= amount;

            state.next_id += 1;
            let user_bet = MockUserBet {
                id: state.next_id,
                bet_id: bet.id,
                user_id: user_id.to_string(),
                team_selected: team,
                amount,
                potential_win: amount * odds,
                settled: false,
            };
            let response = json!({"message": "Bet placed", "user_bet": user_bet_json(&user_bet)});
            state.user_bets.push(user_bet);
            reply(200, response)
        }
        _ => reply(404, json!({"detail": "Not Found"})),
    }
}
