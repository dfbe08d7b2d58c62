//! HTTP/JSON client for the game service.

use std::collections::{HashMap, HashSet};
use std::fmt;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::infra::{Action, Config, Position};
use crate::state::{
    Bullet, Enemy, MapResources, MapState, MapStatus, ObstacleSet, PlaythroughState, Treasure,
};

const TOKEN_HEADER: &str = "story-playthrough-token";
const MAP_ALREADY_OVER: &str = "GAME_ON_MAP_IS_ALREADY_OVER";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConflictReason {
    /// The level ended between reading the state and submitting the action.
    MapAlreadyOver,
    Other(String),
}

impl ConflictReason {
    fn from_body(body: &str) -> Self {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct ConflictBody {
            sub_name: Option<String>,
        }

        match serde_json::from_str::<ConflictBody>(body) {
            Ok(ConflictBody {
                sub_name: Some(sub_name),
            }) if sub_name == MAP_ALREADY_OVER => ConflictReason::MapAlreadyOver,
            Ok(ConflictBody {
                sub_name: Some(sub_name),
            }) => ConflictReason::Other(sub_name),
            _ => ConflictReason::Other(body.to_string()),
        }
    }
}

impl fmt::Display for ConflictReason {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConflictReason::MapAlreadyOver => write!(formatter, "{}", MAP_ALREADY_OVER),
            ConflictReason::Other(reason) => write!(formatter, "{}", reason),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("failed to set up client: {0}")]
    Setup(String),
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("{endpoint} returned HTTP {status}: {body}")]
    UnexpectedStatus {
        endpoint: &'static str,
        status: u16,
        body: String,
    },
    #[error("could not decode {endpoint} response: {message}")]
    Decode {
        endpoint: &'static str,
        message: String,
    },
    #[error("{endpoint} rejected with conflict {reason}")]
    Conflict {
        endpoint: &'static str,
        reason: ConflictReason,
    },
}

impl ServiceError {
    pub fn is_map_already_over(&self) -> bool {
        matches!(
            self,
            ServiceError::Conflict {
                reason: ConflictReason::MapAlreadyOver,
                ..
            }
        )
    }
}

/// Port to the game server. One request is outstanding at a time.
#[allow(async_fn_in_trait)]
pub trait GameService {
    async fn fetch_map_resources(&mut self) -> Result<MapResources, ServiceError>;

    async fn fetch_map_state(&mut self) -> Result<MapState, ServiceError>;

    async fn submit_action(&mut self, action: Action) -> Result<(), ServiceError>;

    async fn reset_level(&mut self) -> Result<(), ServiceError>;

    async fn advance_level(&mut self) -> Result<(), ServiceError>;

    async fn fetch_playthrough_state(&mut self) -> Result<PlaythroughState, ServiceError>;
}

// ============================================================================
// Wire format
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MapResourceResponse {
    #[serde(default)]
    compressed_obstacles: CompressedObstacles,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CompressedObstacles {
    #[serde(default)]
    coordinate_map: HashMap<String, Vec<i32>>,
}

#[derive(Debug, Deserialize)]
struct MapStateResponse {
    map: MapDto,
    #[serde(default)]
    heroes: Vec<HeroDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MapDto {
    status: MapStatus,
    width: i32,
    height: i32,
    #[serde(default)]
    treasures: Vec<TreasureDto>,
    #[serde(default)]
    enemies: Vec<EnemyDto>,
    #[serde(default)]
    bullets: Vec<BulletDto>,
}

#[derive(Debug, Deserialize)]
struct HeroDto {
    position: Position,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TreasureDto {
    position: Position,
    #[serde(default)]
    collected_by_hero_id: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct EnemyDto {
    position: Position,
    health: i32,
}

#[derive(Debug, Deserialize)]
struct BulletDto {
    position: Position,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaythroughResponse {
    current_level: i32,
}

#[derive(Debug, Serialize)]
struct ApproveHeroTurnRequest {
    action: Action,
}

#[derive(Debug, Serialize)]
struct EmptyRequest {}

fn decode_map_resources(body: &str) -> Result<MapResources, ServiceError> {
    let endpoint = "mapResource";
    let response: MapResourceResponse = decode(endpoint, body)?;

    let mut columns: HashMap<i32, HashSet<i32>> = HashMap::new();
    for (x, ys) in response.compressed_obstacles.coordinate_map {
        let x = x.trim().parse::<i32>().map_err(|e| ServiceError::Decode {
            endpoint,
            message: format!("obstacle column '{}': {}", x, e),
        })?;
        columns.entry(x).or_default().extend(ys);
    }

    Ok(MapResources {
        obstacles: ObstacleSet::from(columns),
    })
}

fn decode_map_state(body: &str) -> Result<MapState, ServiceError> {
    let endpoint = "mapState";
    let response: MapStateResponse = decode(endpoint, body)?;

    let hero = response
        .heroes
        .first()
        .map(|h| h.position)
        .ok_or_else(|| ServiceError::Decode {
            endpoint,
            message: "no hero in map state".to_string(),
        })?;

    let map = response.map;
    Ok(MapState {
        status: map.status,
        width: map.width,
        height: map.height,
        hero,
        enemies: map
            .enemies
            .into_iter()
            .map(|e| Enemy {
                position: e.position,
                health: e.health,
            })
            .collect(),
        bullets: map
            .bullets
            .into_iter()
            .map(|b| Bullet {
                position: b.position,
            })
            .collect(),
        treasures: map
            .treasures
            .into_iter()
            .map(|t| Treasure {
                position: t.position,
                collected_by: t.collected_by_hero_id.and_then(|id| match id {
                    serde_json::Value::Null => None,
                    serde_json::Value::String(s) => Some(s),
                    other => Some(other.to_string()),
                }),
            })
            .collect(),
    })
}

fn decode_playthrough(body: &str) -> Result<PlaythroughState, ServiceError> {
    let response: PlaythroughResponse = decode("playthroughState", body)?;
    Ok(PlaythroughState {
        current_level: response.current_level,
    })
}

fn decode<T: DeserializeOwned>(endpoint: &'static str, body: &str) -> Result<T, ServiceError> {
    serde_json::from_str(body).map_err(|e| ServiceError::Decode {
        endpoint,
        message: e.to_string(),
    })
}

// ============================================================================
// Client
// ============================================================================

pub struct PonyPanicClient {
    base_url: String,
    client: Client,
}

impl PonyPanicClient {
    pub fn new(config: &Config) -> Result<Self, ServiceError> {
        let mut headers = HeaderMap::new();
        let token = HeaderValue::from_str(&config.token)
            .map_err(|e| ServiceError::Setup(format!("invalid token header: {}", e)))?;
        headers.insert(TOKEN_HEADER, token);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| ServiceError::Setup(e.to_string()))?;

        Ok(Self {
            base_url: config.base_url.clone(),
            client,
        })
    }

    async fn get(&self, endpoint: &'static str, path: &str) -> Result<String, ServiceError> {
        let url = format!("{}{}", self.base_url, path);
        trace!(%url, "GET");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| ServiceError::Transport { endpoint, source })?;
        Self::read_body(endpoint, response).await
    }

    async fn post<B: Serialize>(
        &self,
        endpoint: &'static str,
        path: &str,
        body: &B,
    ) -> Result<String, ServiceError> {
        let url = format!("{}{}", self.base_url, path);
        trace!(%url, "POST");
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|source| ServiceError::Transport { endpoint, source })?;
        Self::read_body(endpoint, response).await
    }

    async fn read_body(endpoint: &'static str, response: Response) -> Result<String, ServiceError> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|source| ServiceError::Transport { endpoint, source })?;
        trace!(endpoint, status = status.as_u16(), %body, "Response");

        if status == StatusCode::CONFLICT {
            return Err(ServiceError::Conflict {
                endpoint,
                reason: ConflictReason::from_body(&body),
            });
        }
        if !status.is_success() {
            return Err(ServiceError::UnexpectedStatus {
                endpoint,
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }
}

impl GameService for PonyPanicClient {
    async fn fetch_map_resources(&mut self) -> Result<MapResources, ServiceError> {
        let body = self.get("mapResource", "/play/mapResource").await?;
        let resources = decode_map_resources(&body)?;
        debug!("Loaded {} obstacles", resources.obstacles.len());
        Ok(resources)
    }

    async fn fetch_map_state(&mut self) -> Result<MapState, ServiceError> {
        let body = self.get("mapState", "/play/mapState").await?;
        decode_map_state(&body)
    }

    async fn submit_action(&mut self, action: Action) -> Result<(), ServiceError> {
        let request = ApproveHeroTurnRequest { action };
        self.post("approveHeroTurn", "/play/approveHeroTurn", &request)
            .await?;
        Ok(())
    }

    async fn reset_level(&mut self) -> Result<(), ServiceError> {
        self.post("resetLevel", "/story/resetLevel", &EmptyRequest {})
            .await?;
        Ok(())
    }

    async fn advance_level(&mut self) -> Result<(), ServiceError> {
        self.post("nextLevel", "/story/nextLevel", &EmptyRequest {})
            .await?;
        Ok(())
    }

    async fn fetch_playthrough_state(&mut self) -> Result<PlaythroughState, ServiceError> {
        let body = self.get("playthroughState", "/story/playthroughState").await?;
        decode_playthrough(&body)
    }
}
