use std::sync::Arc;

use crate::domain::Domain;
use crate::environment::{Environment, SwarmId};
use crate::error::ConfigError;
use crate::flow::{FlowField, UniformFlow};
use crate::props::COVARIANCE;
use crate::swarm::{Swarm, SwarmConfig};

fn make_environment() -> Environment {
    Environment::new(Domain::new(vec![10.0, 10.0]).unwrap())
}

#[test]
fn test_add_swarm_registers_and_shares_domain() {
    let mut envir = make_environment();

    let a = envir.add_swarm(SwarmConfig::new(5).with_seed(1)).unwrap();
    let b = envir.add_swarm(SwarmConfig::new(7).with_seed(2)).unwrap();

    assert_eq!(envir.len(), 2);
    assert_eq!(a, SwarmId(0));
    assert_eq!(b, SwarmId(1));
    assert_eq!(envir.swarm(b).unwrap().len(), 7);
    assert!(Arc::ptr_eq(envir.swarm(a).unwrap().domain(), envir.domain()));
    assert!(envir.swarm(SwarmId(2)).is_none());
}

#[test]
fn test_attach_swarm_built_on_same_domain() {
    let mut envir = make_environment();
    let swarm = Swarm::new(Arc::clone(envir.domain()), SwarmConfig::new(3).with_seed(1)).unwrap();

    assert_eq!(envir.attach(swarm).unwrap(), SwarmId(0));
}

#[test]
fn test_attach_rejects_foreign_domain() {
    let mut envir = make_environment();
    let swarm = Swarm::with_default_domain(SwarmConfig::new(3).with_seed(1)).unwrap();

    assert!(matches!(envir.attach(swarm), Err(ConfigError::ForeignDomain)));
    assert!(envir.is_empty());
}

#[test]
fn test_with_swarms_preattached() {
    let domain = Arc::new(Domain::new(vec![5.0, 5.0]).unwrap());
    let swarms = vec![
        Swarm::new(Arc::clone(&domain), SwarmConfig::new(2).with_seed(1)).unwrap(),
        Swarm::new(Arc::clone(&domain), SwarmConfig::new(3).with_seed(2)).unwrap(),
    ];

    let envir = Environment::with_swarms(domain, swarms).unwrap();

    assert_eq!(envir.swarms().len(), 2);
}

#[test]
fn test_step_all_advances_each_swarm() {
    let mut envir = make_environment();
    envir.add_swarm(SwarmConfig::new(5).with_seed(1)).unwrap();
    envir.add_swarm(SwarmConfig::new(5).with_seed(2)).unwrap();

    let reports = envir.step_all(0.2).unwrap();

    assert_eq!(reports.len(), 2);
    assert!(envir.swarms().iter().all(|s| s.time() == 0.2));
    assert!(envir.swarms().iter().all(|s| s.history().len() == 1));
}

#[test]
fn test_swarms_with_flow_drift() {
    let flow: Arc<dyn FlowField> = Arc::new(UniformFlow::new(vec![1.0, 0.0]).unwrap());
    let mut envir = make_environment().with_flow(flow).unwrap();
    let id = envir.add_swarm(SwarmConfig::new(4).with_seed(3)).unwrap();

    let swarm = envir.swarm_mut(id).unwrap();
    assert_eq!(swarm.motion_name(), "flow drift");
    swarm.props_mut().scale(COVARIANCE, 0.0);
    let before = swarm.positions().clone();

    swarm.step(0.5).unwrap();

    for idx in swarm.positions().active_indices() {
        let moved = swarm.positions().get(idx, 0) - before.get(idx, 0);
        assert!((moved - 0.5).abs() < 1e-12);
    }
}

#[test]
fn test_flow_dimension_must_match_domain() {
    let flow: Arc<dyn FlowField> = Arc::new(UniformFlow::new(vec![1.0, 0.0, 0.0]).unwrap());

    assert!(matches!(
        make_environment().with_flow(flow),
        Err(ConfigError::FlowShape(_))
    ));
}
