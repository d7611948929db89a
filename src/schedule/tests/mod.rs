mod milestone_tests;
mod periodic_tests;
mod recurrence_tests;
