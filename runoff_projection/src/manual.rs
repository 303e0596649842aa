/*!

This is the long-form manual for `runoff_projection` and `runoffproj`.

## Input format

The survey is a spreadsheet (`.ods`, `.xlsx` or `.xls`). The first row is a
header; the columns are found by name. By default:

| Column            | Content                                              |
|-------------------|------------------------------------------------------|
| `Imie`            | name of the first-round candidate                    |
| `Liczba glosow`   | number of first-round votes                          |
| `Do Trzaskowskiego` | fraction going to the first runoff contender       |
| `Do Nawrockiego`  | fraction going to the second runoff contender        |
| `Nie glosuje`     | fraction abstaining in the runoff                    |
| `Nie wie`         | fraction undecided                                   |

One row, `Nieglosujacy` by default, holds the people who did not vote in the
first round. Its vote count is the number of non-voters.

All the names can be changed in the configuration file.

## Default parameters

Minor candidates (`Jakubiak`, `Bartoszewicz`, `Maciak`, `Woch`) are merged
into `Inni prawica`. The proportions of the merged entry are weighted by the
vote counts.

For a first-round candidate, the undecided voters are split evenly: the
default share for A is `to_a + unsure / 2`, for B `to_b + unsure / 2`, and the
abstention share is `abstain`.

The non-voters are scaled to reach a target turnout of 73% of everyone in the
table. If `total` is the sum of all the vote counts and `nv` the number of
non-voters, the turnout ratio is

```text
ratio = min(max(0.73 * total - (total - nv), 0) / nv, 1)
```

and the default shares are `ratio * (to_a + unsure / 2)`,
`ratio * (to_b + unsure / 2)` and `1 - ratio`.

## Adjusting the parameters

Each share exists in two forms: a fraction between 0 and 1 (the slider, steps
of 0.001) and a percentage between 0 and 100 (the entry, steps of 0.1). Editing
one form updates the other one; the other fields do not move. Values out of
range are clamped and missing values count as 0. A candidate whose three
shares add up to more than 100.1% is listed in the warnings.

## Projection

The projection is computed on request. For each candidate, the part not
assigned explicitly (`1 - to_a - to_b - none`, at least 0) is split evenly.
First-round voters all vote again. For the non-voters, the three shares
together give the fraction that turns out.

```text
runoffproj --config survey.json
> pct 3 a 45
> update
Projected Votes — Trzaskowski: 10,237,004, Nawrocki: 10,112,876
```
*/
