/*!
Non-deterministic finite automata.

Only Thompson NFAs are provided, in [`thompson`].
*/

pub mod thompson;
