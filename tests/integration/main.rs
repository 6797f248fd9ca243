mod helpers;
mod lazy;
mod properties;
mod scenarios;
