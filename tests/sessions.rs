#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use std::sync::Arc;
    use std::thread;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};
    use todoapp::db::db::Db;
    use todoapp::db::tasks::Tasks;
    use todoapp::db::users::Users;
    use todoapp::libs::auth::AuthGate;
    use todoapp::libs::session::Sessions;
    use todoapp::libs::store::TaskStore;

    struct SessionTestContext {
        _temp_dir: TempDir,
        db: Db,
        gate: AuthGate<Users>,
    }

    impl TestContext for SessionTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let db = Db::open(&temp_dir.path().join("todoapp.db")).unwrap();
            SessionTestContext {
                _temp_dir: temp_dir,
                gate: AuthGate::new(Users::new(db.clone())),
                db,
            }
        }
    }

    impl SessionTestContext {
        fn sessions(&self, idle_timeout: Duration) -> Sessions<Tasks> {
            Sessions::new(Tasks::new(self.db.clone()), idle_timeout)
        }
    }

    #[test_context(SessionTestContext)]
    #[test]
    fn test_sessions_are_found_by_token(ctx: &mut SessionTestContext) {
        let sessions = ctx.sessions(Duration::minutes(30));
        let mut session = sessions.create();
        ctx.gate.register(&mut session, "ana", "12345").unwrap();

        let token = sessions.insert(session);

        let shared = sessions.get(&token).unwrap();
        assert_eq!(shared.lock().user().unwrap().username, "ana");
        assert!(sessions.get("not-a-token").is_none());
        assert_eq!(sessions.len(), 1);

        sessions.remove(&token);
        assert!(sessions.get(&token).is_none());
        assert!(sessions.is_empty());
    }

    #[test_context(SessionTestContext)]
    #[test]
    fn test_idle_sessions_expire(ctx: &mut SessionTestContext) {
        let sessions = ctx.sessions(Duration::milliseconds(5));
        let token = sessions.insert(sessions.create());

        thread::sleep(std::time::Duration::from_millis(30));

        assert!(sessions.get(&token).is_none());
        assert_eq!(sessions.len(), 0);
    }

    #[test_context(SessionTestContext)]
    #[test]
    fn test_purge_drops_only_expired_sessions(ctx: &mut SessionTestContext) {
        let sessions = ctx.sessions(Duration::minutes(10));
        sessions.insert(sessions.create());
        sessions.insert(sessions.create());

        assert_eq!(sessions.purge_expired_at(Utc::now() + Duration::minutes(5)), 0);
        assert_eq!(sessions.len(), 2);

        assert_eq!(sessions.purge_expired_at(Utc::now() + Duration::minutes(11)), 2);
        assert!(sessions.is_empty());
    }

    #[test_context(SessionTestContext)]
    #[test]
    fn test_concurrent_adds_on_one_session_are_serialized(ctx: &mut SessionTestContext) {
        let sessions = Arc::new(ctx.sessions(Duration::minutes(30)));
        let mut session = sessions.create();
        let user_id = ctx.gate.register(&mut session, "ana", "12345").unwrap();
        let token = sessions.insert(session);

        let workers: Vec<_> = (0..8)
            .map(|worker| {
                let sessions = Arc::clone(&sessions);
                let token = token.clone();
                thread::spawn(move || {
                    for i in 0..10 {
                        let shared = sessions.get(&token).unwrap();
                        let mut session = shared.lock();
                        let user_ctx = session.context();
                        session.engine.add_task(&user_ctx, &format!("w{worker}-{i}")).unwrap();
                    }
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }

        let stored = Tasks::new(ctx.db.clone()).load_tasks(user_id).unwrap();
        let shared = sessions.get(&token).unwrap();
        let session = shared.lock();
        assert_eq!(stored.len(), 80);
        assert_eq!(stored, session.engine.records());
    }
}
