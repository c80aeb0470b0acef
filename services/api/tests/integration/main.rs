mod follow_test;
mod helpers;
mod recipe_list_test;
mod recipe_test;
