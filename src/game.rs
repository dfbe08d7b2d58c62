use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, error};

use crate::infra::{Action, GameObserver, GameService, ServiceError, StepError};
use crate::planners::heuristic::{ActionSelector, HeuristicMode};
use crate::state::{EpisodeCache, MapState, MapStatus};

/// Cooperative stop request, checked before each state fetch.
#[derive(Debug, Clone, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ControllerError {
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error("planner invariant violated: {0}")]
    Invariant(#[from] StepError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopExit {
    Stopped,
}

/// What a single turn did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    Acted(Action),
    /// Level lost (or already over on submit) and reset.
    Reset,
    /// Level won; carries the new level.
    Advanced(i32),
}

/// Drives fetch, decide, submit turns and the level lifecycle around them.
pub struct TurnController<S: GameService> {
    service: S,
    observer: Box<dyn GameObserver>,
    heuristic: HeuristicMode,
    stop: StopSignal,
    cache: Option<EpisodeCache>,
}

impl<S: GameService> TurnController<S> {
    pub fn new(service: S, observer: impl GameObserver + 'static, heuristic: HeuristicMode) -> Self {
        Self {
            service,
            observer: Box::new(observer),
            heuristic,
            stop: StopSignal::new(),
            cache: None,
        }
    }

    pub fn with_stop_signal(mut self, stop: StopSignal) -> Self {
        self.stop = stop;
        self
    }

    pub fn stop_signal(&self) -> StopSignal {
        self.stop.clone()
    }

    pub fn episode_cache(&self) -> Option<&EpisodeCache> {
        self.cache.as_ref()
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// Play turns until stopped. Every error returned here is fatal.
    pub async fn run_episode_loop(&mut self) -> Result<LoopExit, ControllerError> {
        let playthrough = self.service.fetch_playthrough_state().await?;
        self.observer.on_playthrough_start(playthrough.current_level);

        loop {
            if self.stop.is_stopped() {
                self.observer.on_stopped();
                return Ok(LoopExit::Stopped);
            }
            if let Err(e) = self.run_turn().await {
                error!("Turn failed: {}", e);
                return Err(e);
            }
        }
    }

    pub async fn run_turn(&mut self) -> Result<TurnOutcome, ControllerError> {
        let state = self.service.fetch_map_state().await?;

        match state.status {
            MapStatus::Lost => {
                self.observer.on_level_lost(&state);
                self.reset_level().await?;
                return Ok(TurnOutcome::Reset);
            }
            MapStatus::Won => {
                self.cache = None;
                self.observer.on_level_won(&state);
                self.service.advance_level().await?;
                let playthrough = self.service.fetch_playthrough_state().await?;
                self.observer.on_new_level(playthrough.current_level);
                return Ok(TurnOutcome::Advanced(playthrough.current_level));
            }
            MapStatus::Playing => {}
        }

        let cache = match self.cache.take() {
            Some(cache) => cache,
            None => self.load_episode(&state).await?,
        };
        let cache = self.cache.insert(cache);

        let turn = cache.record_turn();
        self.observer.on_state_update(&state, turn);

        let decision = ActionSelector::new(cache.map(), self.heuristic).select(&state)?;
        self.observer.on_action_selected(&decision, &state);

        match self.service.submit_action(decision.action).await {
            Ok(()) => Ok(TurnOutcome::Acted(decision.action)),
            // The level ended between our state read and the submit.
            Err(e) if e.is_map_already_over() => {
                self.observer.on_map_already_over(decision.action);
                self.reset_level().await?;
                Ok(TurnOutcome::Reset)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn load_episode(&mut self, state: &MapState) -> Result<EpisodeCache, ServiceError> {
        let resources = self.service.fetch_map_resources().await?;
        debug!("Loaded map resources: {} obstacles", resources.obstacles.len());
        let cache = EpisodeCache::new(state, resources.obstacles);
        self.observer.on_episode_start(cache.map());
        Ok(cache)
    }

    async fn reset_level(&mut self) -> Result<(), ServiceError> {
        self.cache = None;
        self.service.reset_level().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{ConflictReason, Position};
    use crate::planners::heuristic::Decision;
    use crate::state::{Enemy, Map, MapResources, ObstacleSet, PlaythroughState, Treasure};
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Call {
        Resources,
        State,
        Submit(Action),
        Reset,
        Advance,
        Playthrough,
    }

    #[derive(Default)]
    struct ScriptedService {
        states: VecDeque<MapState>,
        submit_errors: VecDeque<Option<ServiceError>>,
        obstacles: ObstacleSet,
        level: i32,
        calls: Vec<Call>,
    }

    impl ScriptedService {
        fn new(states: Vec<MapState>) -> Self {
            Self {
                states: states.into(),
                level: 1,
                ..Default::default()
            }
        }

        fn count(&self, call: &Call) -> usize {
            self.calls.iter().filter(|c| *c == call).count()
        }

        fn submitted(&self) -> Vec<Action> {
            self.calls
                .iter()
                .filter_map(|c| match c {
                    Call::Submit(action) => Some(*action),
                    _ => None,
                })
                .collect()
        }
    }

    impl GameService for ScriptedService {
        async fn fetch_map_resources(&mut self) -> Result<MapResources, ServiceError> {
            self.calls.push(Call::Resources);
            Ok(MapResources {
                obstacles: self.obstacles.clone(),
            })
        }

        async fn fetch_map_state(&mut self) -> Result<MapState, ServiceError> {
            self.calls.push(Call::State);
            self.states.pop_front().ok_or(ServiceError::UnexpectedStatus {
                endpoint: "mapState",
                status: 503,
                body: "script exhausted".to_string(),
            })
        }

        async fn submit_action(&mut self, action: Action) -> Result<(), ServiceError> {
            self.calls.push(Call::Submit(action));
            match self.submit_errors.pop_front().flatten() {
                Some(e) => Err(e),
                None => Ok(()),
            }
        }

        async fn reset_level(&mut self) -> Result<(), ServiceError> {
            self.calls.push(Call::Reset);
            Ok(())
        }

        async fn advance_level(&mut self) -> Result<(), ServiceError> {
            self.calls.push(Call::Advance);
            self.level += 1;
            Ok(())
        }

        async fn fetch_playthrough_state(&mut self) -> Result<PlaythroughState, ServiceError> {
            self.calls.push(Call::Playthrough);
            Ok(PlaythroughState {
                current_level: self.level,
            })
        }
    }

    #[derive(Clone, Default)]
    struct RecordingObserver {
        events: Rc<RefCell<Vec<String>>>,
    }

    impl RecordingObserver {
        fn push(&self, event: String) {
            self.events.borrow_mut().push(event);
        }
    }

    impl GameObserver for RecordingObserver {
        fn on_playthrough_start(&mut self, level: i32) {
            self.push(format!("start:{level}"));
        }

        fn on_episode_start(&mut self, _map: &Map) {
            self.push("episode".to_string());
        }

        fn on_state_update(&mut self, _state: &MapState, turn: u32) {
            self.push(format!("turn:{turn}"));
        }

        fn on_action_selected(&mut self, decision: &Decision, _state: &MapState) {
            self.push(decision.action.as_str_name().to_string());
        }

        fn on_map_already_over(&mut self, _action: Action) {
            self.push("over".to_string());
        }

        fn on_level_lost(&mut self, _state: &MapState) {
            self.push("lost".to_string());
        }

        fn on_level_won(&mut self, _state: &MapState) {
            self.push("won".to_string());
        }

        fn on_new_level(&mut self, level: i32) {
            self.push(format!("level:{level}"));
        }

        fn on_stopped(&mut self) {
            self.push("stopped".to_string());
        }
    }

    fn with_status(status: MapStatus) -> MapState {
        MapState {
            status,
            ..MapState::playing(5, 5, Position::new(0, 0))
        }
    }

    fn with_treasure(hero: Position, treasure: Position) -> MapState {
        let mut state = MapState::playing(5, 5, hero);
        state.treasures = vec![Treasure {
            position: treasure,
            collected_by: None,
        }];
        state
    }

    fn controller(service: ScriptedService) -> (TurnController<ScriptedService>, RecordingObserver) {
        let observer = RecordingObserver::default();
        let controller = TurnController::new(service, observer.clone(), HeuristicMode::ThreatBiased);
        (controller, observer)
    }

    #[tokio::test]
    async fn test_lost_resets_without_acting() {
        let (mut controller, observer) = controller(ScriptedService::new(vec![with_status(MapStatus::Lost)]));

        let outcome = controller.run_turn().await.unwrap();
        assert_eq!(outcome, TurnOutcome::Reset);
        assert_eq!(controller.service().calls, vec![Call::State, Call::Reset]);
        assert!(controller.episode_cache().is_none());
        assert_eq!(*observer.events.borrow(), vec!["lost"]);
    }

    #[tokio::test]
    async fn test_won_advances_level() {
        let (mut controller, observer) = controller(ScriptedService::new(vec![with_status(MapStatus::Won)]));

        let outcome = controller.run_turn().await.unwrap();
        assert_eq!(outcome, TurnOutcome::Advanced(2));
        assert_eq!(
            controller.service().calls,
            vec![Call::State, Call::Advance, Call::Playthrough]
        );
        assert!(controller.episode_cache().is_none());
        assert_eq!(*observer.events.borrow(), vec!["won", "level:2"]);
    }

    #[tokio::test]
    async fn test_resources_loaded_once_per_episode() {
        let (mut controller, _) = controller(ScriptedService::new(vec![
            with_treasure(Position::new(0, 0), Position::new(3, 0)),
            with_treasure(Position::new(1, 0), Position::new(3, 0)),
            with_treasure(Position::new(2, 0), Position::new(3, 0)),
        ]));

        for _ in 0..3 {
            let outcome = controller.run_turn().await.unwrap();
            assert_eq!(outcome, TurnOutcome::Acted(Action::MoveRight));
        }
        assert_eq!(controller.service().count(&Call::Resources), 1);
        assert_eq!(controller.episode_cache().map(|c| c.turns()), Some(3));
    }

    #[tokio::test]
    async fn test_cache_rebuilt_after_level_change() {
        let (mut controller, _) = controller(ScriptedService::new(vec![
            MapState::playing(5, 5, Position::new(0, 0)),
            with_status(MapStatus::Won),
            MapState::playing(9, 9, Position::new(0, 0)),
            with_status(MapStatus::Lost),
            MapState::playing(9, 9, Position::new(0, 0)),
        ]));

        for _ in 0..5 {
            controller.run_turn().await.unwrap();
        }
        assert_eq!(controller.service().count(&Call::Resources), 3);
        assert_eq!(controller.episode_cache().map(|c| c.map().width()), Some(9));
        assert_eq!(controller.service().submitted(), vec![Action::Nothing; 3]);
    }

    #[tokio::test]
    async fn test_map_already_over_on_submit_resets() {
        let mut service = ScriptedService::new(vec![
            with_treasure(Position::new(0, 0), Position::new(0, 2)),
            with_treasure(Position::new(0, 0), Position::new(0, 2)),
        ]);
        service.submit_errors = VecDeque::from([Some(ServiceError::Conflict {
            endpoint: "approveHeroTurn",
            reason: ConflictReason::MapAlreadyOver,
        })]);
        let (mut controller, observer) = controller(service);

        assert_eq!(controller.run_turn().await.unwrap(), TurnOutcome::Reset);
        assert!(controller.episode_cache().is_none());

        assert_eq!(
            controller.run_turn().await.unwrap(),
            TurnOutcome::Acted(Action::MoveUp)
        );
        assert_eq!(controller.service().count(&Call::Resources), 2);
        assert_eq!(controller.service().count(&Call::Reset), 1);
        assert!(observer.events.borrow().contains(&"over".to_string()));
    }

    #[tokio::test]
    async fn test_other_conflict_is_fatal() {
        let mut service = ScriptedService::new(vec![MapState::playing(5, 5, Position::new(0, 0))]);
        service.submit_errors = VecDeque::from([Some(ServiceError::Conflict {
            endpoint: "approveHeroTurn",
            reason: ConflictReason::Other("HERO_IS_STUNNED".to_string()),
        })]);
        let (mut controller, _) = controller(service);

        let err = controller.run_turn().await.unwrap_err();
        assert!(matches!(
            err,
            ControllerError::Service(ServiceError::Conflict {
                reason: ConflictReason::Other(_),
                ..
            })
        ));
        assert_eq!(controller.service().count(&Call::Reset), 0);
    }

    #[tokio::test]
    async fn test_loop_halts_on_service_failure() {
        let mut state = MapState::playing(5, 5, Position::new(2, 2));
        state.enemies = vec![Enemy {
            position: Position::new(3, 2),
            health: 5,
        }];
        let (mut controller, observer) = controller(ScriptedService::new(vec![state]));

        let err = controller.run_episode_loop().await.unwrap_err();
        assert!(matches!(
            err,
            ControllerError::Service(ServiceError::UnexpectedStatus { status: 503, .. })
        ));
        assert_eq!(controller.service().submitted(), vec![Action::KickRight]);
        assert_eq!(
            *observer.events.borrow(),
            vec!["start:1", "episode", "turn:1", "KICK_RIGHT"]
        );
    }

    #[tokio::test]
    async fn test_stop_before_next_fetch() {
        let (controller, observer) = controller(ScriptedService::new(vec![with_status(MapStatus::Playing)]));
        let stop = StopSignal::new();
        let mut controller = controller.with_stop_signal(stop.clone());
        stop.stop();

        assert_eq!(controller.run_episode_loop().await.unwrap(), LoopExit::Stopped);
        assert_eq!(controller.service().calls, vec![Call::Playthrough]);
        assert_eq!(*observer.events.borrow(), vec!["start:1", "stopped"]);
    }
}
