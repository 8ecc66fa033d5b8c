//! Общие DTO между backend и браузерным клиентом дашборда

pub mod dashboards;
pub mod domain;
pub mod usecases;
