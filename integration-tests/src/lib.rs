#![cfg(test)]

mod admin_flow;
mod context;
mod happy_flow;
mod ico_flow;
mod legacy_contract;
mod measure;
mod misconfiguration;
